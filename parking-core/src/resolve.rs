//! Matching assignment cells against the employee directory.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::config::UnresolvedPolicy;
use crate::date_range::DateRange;
use crate::error::{ParkingError, ParkingResult};
use crate::roster::Roster;

/// One reservation: an employee holding a slot on a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEvent {
    pub date: NaiveDate,
    pub slot: String,
    pub name: String,
    pub address: String,
}

/// Reservations grouped by employee code.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Events per employee, in row-then-column order
    pub by_employee: BTreeMap<String, Vec<ResolvedEvent>>,
    /// In-range cells whose code is not in the directory
    pub unresolved: usize,
}

impl Resolution {
    pub fn event_count(&self) -> usize {
        self.by_employee.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_employee.is_empty()
    }
}

/// Collect the reservations of every in-range row.
///
/// Blank cells are ignored. Codes missing from the directory are handled
/// according to `policy`.
pub fn resolve(
    roster: &Roster,
    range: &DateRange,
    policy: UnresolvedPolicy,
) -> ParkingResult<Resolution> {
    let mut resolution = Resolution::default();

    for row in roster.rows.iter().filter(|row| range.contains(row.date)) {
        for (slot, code) in roster.slots.iter().zip(&row.codes) {
            let Some(code) = code else {
                continue;
            };

            let Some(employee) = roster.employee(code) else {
                match policy {
                    UnresolvedPolicy::Skip => {}
                    UnresolvedPolicy::Warn => {
                        warn!("Unknown employee code '{}' on {} (slot {}), skipped", code, row.date, slot);
                    }
                    UnresolvedPolicy::Fail => {
                        return Err(ParkingError::UnknownEmployee {
                            code: code.clone(),
                            date: row.date,
                            slot: slot.clone(),
                        });
                    }
                }
                resolution.unresolved += 1;
                continue;
            };

            resolution
                .by_employee
                .entry(employee.code.clone())
                .or_default()
                .push(ResolvedEvent {
                    date: row.date,
                    slot: slot.clone(),
                    name: employee.name.clone(),
                    address: employee.address.clone(),
                });
        }
    }

    Ok(resolution)
}
