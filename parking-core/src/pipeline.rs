//! Roster → reservations → archive, in one call.
//!
//! Everything that can be rejected (missing file, bad sheet, bad date,
//! unknown code under the `fail` policy) is checked before the first file
//! is written. Once writing starts, a failure leaves the partial output on
//! disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use tracing::info;

use crate::artifact::{EventTemplate, write_output_tree};
use crate::archive::build_archive;
use crate::config::ParkingConfig;
use crate::constants::{ARCHIVE_EXTENSION, ARCHIVE_PREFIX, OUTPUT_DIR_PREFIX, RUN_STAMP_FORMAT};
use crate::date_range::DateRange;
use crate::error::ParkingResult;
use crate::resolve::{Resolution, resolve};
use crate::roster::Roster;

/// Inputs of one run.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub range: DateRange,
    /// Roster workbook
    pub source: PathBuf,
    /// Folder receiving the output directory and the archive
    pub destination: PathBuf,
}

impl GenerateRequest {
    /// Build a request from plain strings, expanding `~` in both paths.
    pub fn from_args(
        start_date: &str,
        end_date: &str,
        source_path: &str,
        destination_folder: &str,
    ) -> ParkingResult<Self> {
        Ok(GenerateRequest {
            range: DateRange::from_args(start_date, end_date)?,
            source: expand_path(source_path),
            destination: expand_path(destination_folder),
        })
    }
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub archive_path: PathBuf,
    pub output_dir: PathBuf,
    /// Every .ics file written, in write order
    pub files: Vec<PathBuf>,
    /// Employees with at least one reservation
    pub employees: usize,
    /// Assignment cells dropped because their code is not in the directory
    pub unresolved: usize,
}

pub struct Pipeline {
    config: ParkingConfig,
    template: EventTemplate,
}

impl Pipeline {
    pub fn new(config: ParkingConfig) -> ParkingResult<Self> {
        let template = config.event_template()?;
        Ok(Pipeline { config, template })
    }

    pub fn read(&self, source: &Path) -> ParkingResult<Roster> {
        Roster::read(
            source,
            &self.config.employees_sheet,
            &self.config.assignments_sheet,
        )
    }

    /// Read and resolve without writing anything.
    pub fn preview(&self, source: &Path, range: &DateRange) -> ParkingResult<Resolution> {
        let roster = self.read(source)?;
        resolve(&roster, range, self.config.unresolved_codes)
    }

    pub fn generate(&self, request: &GenerateRequest) -> ParkingResult<GenerateOutcome> {
        self.generate_at(request, Local::now())
    }

    /// Run with an explicit clock, which names the output directory and archive.
    pub fn generate_at(
        &self,
        request: &GenerateRequest,
        now: DateTime<Local>,
    ) -> ParkingResult<GenerateOutcome> {
        let resolution = self.preview(&request.source, &request.range)?;

        info!(
            events = resolution.event_count(),
            employees = resolution.by_employee.len(),
            unresolved = resolution.unresolved,
            "Resolved assignments for {}",
            request.range
        );

        let run_stamp = now.format(RUN_STAMP_FORMAT).to_string();
        let output_dir = request
            .destination
            .join(format!("{}{}", OUTPUT_DIR_PREFIX, run_stamp));
        let archive_path = request.destination.join(format!(
            "{}{}.{}",
            ARCHIVE_PREFIX, run_stamp, ARCHIVE_EXTENSION
        ));

        let files = write_output_tree(
            &resolution.by_employee,
            &output_dir,
            &self.template,
            now.with_timezone(&Utc),
        )?;
        info!("Wrote {} reservations to {}", files.len(), output_dir.display());

        let archived = build_archive(&output_dir, &archive_path)?;
        info!("Packed {} files into {}", archived, archive_path.display());

        Ok(GenerateOutcome {
            archive_path,
            output_dir,
            files,
            employees: resolution.by_employee.len(),
            unresolved: resolution.unresolved,
        })
    }
}

/// Generate reservations for `[start_date, end_date]` from the roster at
/// `source_path` and return the path of the archive written to
/// `destination_folder`.
///
/// Uses the configuration file at its default location, if there is one.
pub fn run(
    start_date: &str,
    end_date: &str,
    source_path: &str,
    destination_folder: &str,
) -> ParkingResult<PathBuf> {
    run_with(
        ParkingConfig::load()?,
        start_date,
        end_date,
        source_path,
        destination_folder,
    )
}

/// [`run`] with an explicit configuration instead of the one on disk.
pub fn run_with(
    config: ParkingConfig,
    start_date: &str,
    end_date: &str,
    source_path: &str,
    destination_folder: &str,
) -> ParkingResult<PathBuf> {
    let request = GenerateRequest::from_args(start_date, end_date, source_path, destination_folder)?;
    let pipeline = Pipeline::new(config)?;
    Ok(pipeline.generate(&request)?.archive_path)
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.trim()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParkingError;

    #[test]
    fn test_request_from_args_parses_range() {
        let request =
            GenerateRequest::from_args("2024-06-01", "2024-06-07", "roster.xlsx", "out").unwrap();
        assert_eq!(request.range.to_string(), "2024-06-01..2024-06-07");
        assert_eq!(request.source, PathBuf::from("roster.xlsx"));
        assert_eq!(request.destination, PathBuf::from("out"));
    }

    #[test]
    fn test_request_from_args_rejects_bad_range() {
        let result = GenerateRequest::from_args("2024-06-07", "2024-06-01", "r.xlsx", "out");
        assert!(matches!(result, Err(ParkingError::InvalidRange(_))));
    }

    #[test]
    fn test_missing_roster_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let request = GenerateRequest {
            range: DateRange::from_args("2024-06-01", "2024-06-07").unwrap(),
            source: dir.path().join("missing.xlsx"),
            destination: dir.path().join("dest"),
        };

        let pipeline = Pipeline::new(ParkingConfig::default()).unwrap();
        let result = pipeline.generate(&request);

        assert!(matches!(result, Err(ParkingError::SourceNotFound(_))));
        assert!(!dir.path().join("dest").exists());
    }

    #[test]
    fn test_pipeline_rejects_invalid_template() {
        let mut config = ParkingConfig::default();
        config.event.start_time = "25:00".to_string();
        assert!(matches!(
            Pipeline::new(config),
            Err(ParkingError::Config(_))
        ));
    }
}
