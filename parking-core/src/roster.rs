//! Roster workbook reading.
//!
//! A roster is a workbook with two sheets:
//! - the employee directory: `code | name | address`, one header row
//! - the assignments grid: a header row of slot labels (first column ignored),
//!   then one row per date with the employee code parked in each slot

use std::collections::HashMap;
use std::path::Path;

use calamine::{Data, DataType, Range, Reader, open_workbook_auto};
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::constants::DATE_FORMAT;
use crate::error::{ParkingError, ParkingResult};

/// An employee from the directory sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    /// Short unique key used in the assignments grid (usually initials)
    pub code: String,
    pub name: String,
    /// Contact address, also the basis of the event UID
    pub address: String,
}

/// One dated row of the assignments grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAssignmentRow {
    pub date: NaiveDate,
    /// One entry per slot label, `None` for a blank cell
    pub codes: Vec<Option<String>>,
}

/// Everything read from a roster workbook.
#[derive(Debug, Clone)]
pub struct Roster {
    pub employees: HashMap<String, EmployeeRecord>,
    pub slots: Vec<String>,
    pub rows: Vec<RawAssignmentRow>,
}

impl Roster {
    /// Open a workbook (xlsx, xlsm, xls or ods) and read both sheets.
    pub fn read(path: &Path, employees_sheet: &str, assignments_sheet: &str) -> ParkingResult<Self> {
        if !path.is_file() {
            return Err(ParkingError::SourceNotFound(path.to_path_buf()));
        }

        let mut workbook = open_workbook_auto(path).map_err(|e| ParkingError::Workbook {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let sheet_names = workbook.sheet_names();
        let mut range_of = |name: &str| -> ParkingResult<Range<Data>> {
            if !sheet_names.iter().any(|n| n == name) {
                return Err(ParkingError::MissingSheet(name.to_string()));
            }
            workbook
                .worksheet_range(name)
                .map_err(|e| ParkingError::Workbook {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
        };

        let employees = range_of(employees_sheet)?;
        let assignments = range_of(assignments_sheet)?;

        let roster = Roster {
            employees: parse_directory(employees_sheet, first_row(&employees), employees.rows())?,
            ..parse_assignments(assignments_sheet, first_row(&assignments), assignments.rows())?
        };

        debug!(
            employees = roster.employees.len(),
            slots = roster.slots.len(),
            rows = roster.rows.len(),
            "Read roster from {}",
            path.display()
        );

        Ok(roster)
    }

    /// Build a roster from already-loaded sheet rows, both starting at row 1.
    pub fn from_rows<'a, E, A>(
        employees_sheet: &str,
        employees: E,
        assignments_sheet: &str,
        assignments: A,
    ) -> ParkingResult<Self>
    where
        E: IntoIterator<Item = &'a [Data]>,
        A: IntoIterator<Item = &'a [Data]>,
    {
        Ok(Roster {
            employees: parse_directory(employees_sheet, 1, employees)?,
            ..parse_assignments(assignments_sheet, 1, assignments)?
        })
    }

    pub fn employee(&self, code: &str) -> Option<&EmployeeRecord> {
        self.employees.get(code)
    }
}

/// 1-based sheet row number of the first row in `range`.
fn first_row(range: &Range<Data>) -> usize {
    range.start().map_or(1, |(row, _)| row as usize + 1)
}

fn parse_directory<'a, I>(
    sheet: &str,
    first_row: usize,
    rows: I,
) -> ParkingResult<HashMap<String, EmployeeRecord>>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut employees = HashMap::new();

    // First row is the header
    for (idx, row) in rows.into_iter().enumerate().skip(1) {
        let row_number = first_row + idx;
        let field = |col: usize| row.get(col).and_then(cell_text);

        let (code, name, address) = (field(0), field(1), field(2));
        if code.is_none() && name.is_none() && address.is_none() {
            continue;
        }

        let malformed = |reason: &str| ParkingError::MalformedRow {
            sheet: sheet.to_string(),
            row: row_number,
            reason: reason.to_string(),
        };
        let code = code.ok_or_else(|| malformed("missing employee code"))?;
        let name = name.ok_or_else(|| malformed("missing employee name"))?;
        let address = address.ok_or_else(|| malformed("missing contact address"))?;
        if !is_valid_code(&code) {
            return Err(malformed(&format!(
                "employee code '{}' cannot be used as a folder name",
                code
            )));
        }

        let record = EmployeeRecord {
            code: code.clone(),
            name,
            address,
        };
        if employees.insert(code.clone(), record).is_some() {
            warn!("Sheet '{}', row {}: duplicate employee code '{}', later row wins", sheet, row_number, code);
        }
    }

    if employees.is_empty() {
        return Err(ParkingError::EmptySheet(sheet.to_string()));
    }

    Ok(employees)
}

/// Slot labels and dated rows. The returned roster has no employees yet.
fn parse_assignments<'a, I>(sheet: &str, first_row: usize, rows: I) -> ParkingResult<Roster>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows.into_iter();
    let header = rows
        .next()
        .ok_or_else(|| ParkingError::EmptySheet(sheet.to_string()))?;

    let slots = parse_slot_labels(sheet, first_row, header)?;
    let mut parsed = Vec::new();

    for (idx, row) in rows.enumerate() {
        let row_number = first_row + idx + 1;

        if row.iter().all(|cell| cell_text(cell).is_none()) {
            continue;
        }

        let date_cell = row.first().unwrap_or(&Data::Empty);
        let date = cell_date(date_cell).ok_or_else(|| ParkingError::MalformedDate {
            sheet: sheet.to_string(),
            row: row_number,
            value: cell_text(date_cell).unwrap_or_default(),
        })?;

        if let Some(column) = row
            .iter()
            .enumerate()
            .skip(slots.len() + 1)
            .find_map(|(col, cell)| cell_text(cell).map(|_| col + 1))
        {
            return Err(ParkingError::MisalignedRow {
                sheet: sheet.to_string(),
                row: row_number,
                column,
                slots: slots.len(),
            });
        }

        let codes = (1..=slots.len())
            .map(|col| row.get(col).and_then(cell_text))
            .collect();

        parsed.push(RawAssignmentRow { date, codes });
    }

    Ok(Roster {
        employees: HashMap::new(),
        slots,
        rows: parsed,
    })
}

fn parse_slot_labels(sheet: &str, row: usize, header: &[Data]) -> ParkingResult<Vec<String>> {
    let mut labels: Vec<Option<String>> = header.iter().skip(1).map(cell_text).collect();
    while labels.last().is_some_and(Option::is_none) {
        labels.pop();
    }

    if labels.is_empty() {
        return Err(ParkingError::MalformedRow {
            sheet: sheet.to_string(),
            row,
            reason: "header has no slot columns".to_string(),
        });
    }

    labels
        .into_iter()
        .enumerate()
        .map(|(idx, label)| {
            label.ok_or_else(|| ParkingError::MalformedRow {
                sheet: sheet.to_string(),
                row,
                reason: format!("blank slot label in column {}", idx + 2),
            })
        })
        .collect()
}

/// Codes name the per-employee output folders.
fn is_valid_code(code: &str) -> bool {
    code != "." && code != ".." && !code.contains(['/', '\\', ':'])
}

/// Trimmed text of a cell, `None` when blank.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        // Codes typed as numbers come back as floats
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    };

    if text.is_empty() { None } else { Some(text) }
}

fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) => parse_date_text(s),
        Data::DateTime(_) => cell.as_date(),
        _ => None,
    }
}

/// `YYYY-MM-DD`, or an ISO datetime whose date part is used.
fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Some(date);
    }

    let (date, time) = text.split_at_checked(10)?;
    if !time.starts_with(['T', ' ']) {
        return None;
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    fn directory() -> Vec<Vec<Data>> {
        vec![
            vec![s("Code"), s("Name"), s("Email")],
            vec![s("AB"), s("Ana Bravo"), s("ana@x.com")],
            vec![s("CD"), s("Carlos Diaz"), s("carlos@x.com")],
        ]
    }

    fn read(employees: &[Vec<Data>], assignments: &[Vec<Data>]) -> ParkingResult<Roster> {
        Roster::from_rows(
            "Employees",
            employees.iter().map(Vec::as_slice),
            "Assignments",
            assignments.iter().map(Vec::as_slice),
        )
    }

    #[test]
    fn test_reads_directory_slots_and_rows() {
        let assignments = vec![
            vec![s("Fecha"), s("Lot1"), s("Lot2")],
            vec![s("2024-06-03"), s("AB"), s("")],
            vec![s("2024-06-04"), Data::Empty, s(" CD ")],
        ];

        let roster = read(&directory(), &assignments).unwrap();

        assert_eq!(roster.employees.len(), 2);
        assert_eq!(roster.employee("AB").unwrap().name, "Ana Bravo");
        assert_eq!(roster.slots, vec!["Lot1", "Lot2"]);
        assert_eq!(roster.rows.len(), 2);
        assert_eq!(
            roster.rows[0],
            RawAssignmentRow {
                date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
                codes: vec![Some("AB".to_string()), None],
            }
        );
        assert_eq!(roster.rows[1].codes, vec![None, Some("CD".to_string())]);
    }

    #[test]
    fn test_short_rows_are_padded_to_slot_count() {
        let assignments = vec![
            vec![s("Fecha"), s("Lot1"), s("Lot2"), s("Lot3")],
            vec![s("2024-06-03"), s("AB")],
        ];

        let roster = read(&directory(), &assignments).unwrap();
        assert_eq!(roster.rows[0].codes.len(), 3);
    }

    #[test]
    fn test_trailing_blank_header_cells_are_trimmed() {
        let assignments = vec![
            vec![s("Fecha"), s("Lot1"), Data::Empty, Data::Empty],
            vec![s("2024-06-03"), s("AB"), Data::Empty, Data::Empty],
        ];

        let roster = read(&directory(), &assignments).unwrap();
        assert_eq!(roster.slots, vec!["Lot1"]);
    }

    #[test]
    fn test_value_beyond_last_slot_is_misaligned() {
        let assignments = vec![
            vec![s("Fecha"), s("Lot1"), Data::Empty],
            vec![s("2024-06-03"), s("AB"), s("CD")],
        ];

        let err = read(&directory(), &assignments).unwrap_err();
        assert!(
            matches!(err, ParkingError::MisalignedRow { row: 2, column: 3, slots: 1, .. }),
            "got {err}"
        );
    }

    #[test]
    fn test_malformed_date_is_fatal() {
        let assignments = vec![
            vec![s("Fecha"), s("Lot1")],
            vec![s("03/06/2024"), s("AB")],
        ];

        let err = read(&directory(), &assignments).unwrap_err();
        match err {
            ParkingError::MalformedDate { row, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(value, "03/06/2024");
            }
            other => panic!("expected MalformedDate, got {other}"),
        }
    }

    #[test]
    fn test_blank_date_with_codes_is_fatal() {
        let assignments = vec![vec![s("Fecha"), s("Lot1")], vec![Data::Empty, s("AB")]];
        assert!(matches!(
            read(&directory(), &assignments),
            Err(ParkingError::MalformedDate { .. })
        ));
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let assignments = vec![
            vec![s("Fecha"), s("Lot1")],
            vec![Data::Empty, Data::Empty],
            vec![s("2024-06-03"), s("AB")],
        ];

        let roster = read(&directory(), &assignments).unwrap();
        assert_eq!(roster.rows.len(), 1);
    }

    #[test]
    fn test_iso_datetime_cells_are_accepted() {
        let assignments = vec![
            vec![s("Fecha"), s("Lot1")],
            vec![Data::DateTimeIso("2024-06-03T00:00:00".to_string()), s("AB")],
        ];

        let roster = read(&directory(), &assignments).unwrap();
        assert_eq!(roster.rows[0].date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }

    #[test]
    fn test_iso_datetime_text_uses_date_part() {
        let assignments = vec![
            vec![s("Fecha"), s("Lot1"), s("Lot2")],
            vec![s("2024-06-03T00:00:00"), s("AB"), Data::Empty],
            vec![s("2024-06-04 08:30:00"), Data::Empty, s("CD")],
        ];

        let roster = read(&directory(), &assignments).unwrap();
        assert_eq!(roster.rows[0].date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(roster.rows[1].date, NaiveDate::from_ymd_opt(2024, 6, 4).unwrap());
    }

    #[test]
    fn test_date_with_trailing_garbage_is_fatal() {
        let assignments = vec![
            vec![s("Fecha"), s("Lot1")],
            vec![s("2024-06-03junk"), s("AB")],
        ];

        assert!(matches!(
            read(&directory(), &assignments),
            Err(ParkingError::MalformedDate { row: 2, .. })
        ));
    }

    #[test]
    fn test_numeric_codes_read_as_integers() {
        let employees = vec![
            vec![s("Code"), s("Name"), s("Email")],
            vec![Data::Float(7.0), s("Siete"), s("siete@x.com")],
        ];
        let assignments = vec![
            vec![s("Fecha"), s("Lot1")],
            vec![s("2024-06-03"), Data::Int(7)],
        ];

        let roster = read(&employees, &assignments).unwrap();
        assert!(roster.employee("7").is_some());
        assert_eq!(roster.rows[0].codes, vec![Some("7".to_string())]);
    }

    #[test]
    fn test_directory_without_data_rows_is_empty() {
        let employees = vec![vec![s("Code"), s("Name"), s("Email")]];
        let assignments = vec![vec![s("Fecha"), s("Lot1")]];

        let err = read(&employees, &assignments).unwrap_err();
        assert!(matches!(err, ParkingError::EmptySheet(ref name) if name == "Employees"));
    }

    #[test]
    fn test_directory_row_missing_address_is_malformed() {
        let employees = vec![
            vec![s("Code"), s("Name"), s("Email")],
            vec![s("AB"), s("Ana Bravo")],
        ];
        let assignments = vec![vec![s("Fecha"), s("Lot1")]];

        let err = read(&employees, &assignments).unwrap_err();
        assert!(
            matches!(err, ParkingError::MalformedRow { row: 2, .. }),
            "got {err}"
        );
    }

    #[test]
    fn test_duplicate_code_keeps_later_row() {
        let mut employees = directory();
        employees.push(vec![s("AB"), s("Ana Blanco"), s("ablanco@x.com")]);
        let assignments = vec![vec![s("Fecha"), s("Lot1")]];

        let roster = read(&employees, &assignments).unwrap();
        assert_eq!(roster.employee("AB").unwrap().name, "Ana Blanco");
    }

    #[test]
    fn test_code_that_is_not_a_folder_name_is_rejected() {
        for bad in ["..", "A/B", "A\\B"] {
            let employees = vec![
                vec![s("Code"), s("Name"), s("Email")],
                vec![s(bad), s("Someone"), s("someone@x.com")],
            ];
            let assignments = vec![vec![s("Fecha"), s("Lot1")]];
            assert!(
                matches!(read(&employees, &assignments), Err(ParkingError::MalformedRow { .. })),
                "code '{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_header_without_slots_is_malformed() {
        let assignments = vec![vec![s("Fecha")]];
        assert!(matches!(
            read(&directory(), &assignments),
            Err(ParkingError::MalformedRow { row: 1, .. })
        ));
    }

    #[test]
    fn test_blank_slot_label_between_labels_is_malformed() {
        let assignments = vec![vec![s("Fecha"), s("Lot1"), Data::Empty, s("Lot3")]];
        let err = read(&directory(), &assignments).unwrap_err();
        assert!(err.to_string().contains("column 3"), "got {err}");
    }

    #[test]
    fn test_missing_assignments_header_is_empty_sheet() {
        assert!(matches!(
            read(&directory(), &[]),
            Err(ParkingError::EmptySheet(ref name)) if name == "Assignments"
        ));
    }

    #[test]
    fn test_read_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.xlsx");
        assert!(matches!(
            Roster::read(&path, "Employees", "Assignments"),
            Err(ParkingError::SourceNotFound(_))
        ));
    }
}
