//! Reservation artifacts and the per-employee output tree.
//!
//! ```text
//! <output_root>/
//!   AB/
//!     2024-06-03.ics
//!     2024-06-04.ics
//!   CD/
//!     2024-06-03.ics
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tracing::debug;

use crate::config::UidScope;
use crate::constants::{DATE_FORMAT, ICS_EXTENSION};
use crate::error::{ParkingError, ParkingResult};
use crate::ics::generate_ics;
use crate::resolve::ResolvedEvent;

/// Fixed fields applied to every reservation.
#[derive(Debug, Clone)]
pub struct EventTemplate {
    /// Leading word of the summary
    pub marker: String,
    pub location: String,
    pub description: String,
    /// Local wall-clock start on the reserved day
    pub start_time: NaiveTime,
    pub duration: Duration,
    pub uid_domain: String,
    pub uid_scope: UidScope,
}

/// One reservation, ready to be written as an .ics document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarArtifact {
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// When the run that produced this artifact started (DTSTAMP)
    pub stamp: DateTime<Utc>,
}

impl CalendarArtifact {
    pub fn from_event(event: &ResolvedEvent, template: &EventTemplate, stamp: DateTime<Utc>) -> Self {
        let start = event.date.and_time(template.start_time);

        CalendarArtifact {
            uid: uid_for(event, template),
            summary: format!("{} - {} - {}", template.marker, event.slot, event.name),
            description: template.description.clone(),
            location: template.location.clone(),
            start,
            end: start + template.duration,
            stamp,
        }
    }
}

/// Stable identifier for a reservation. Depends only on the event and template,
/// so regenerating the same roster yields the same UIDs.
pub fn uid_for(event: &ResolvedEvent, template: &EventTemplate) -> String {
    match template.uid_scope {
        UidScope::Employee => format!("{}@{}", event.address, template.uid_domain),
        UidScope::Event => format!(
            "{}-{}-{}@{}",
            event.date.format(DATE_FORMAT),
            slug::slugify(&event.slot),
            event.address,
            template.uid_domain
        ),
    }
}

/// Write one .ics file per event under `<output_root>/<employee_code>/`.
///
/// Existing files with the same name are overwritten. Returns the written paths
/// in the order they were written.
pub fn write_output_tree(
    events_by_employee: &BTreeMap<String, Vec<ResolvedEvent>>,
    output_root: &Path,
    template: &EventTemplate,
    stamp: DateTime<Utc>,
) -> ParkingResult<Vec<PathBuf>> {
    std::fs::create_dir_all(output_root)?;

    let mut written = Vec::new();

    for (code, events) in events_by_employee {
        if events.is_empty() {
            continue;
        }

        let employee_dir = output_root.join(code);
        std::fs::create_dir_all(&employee_dir)?;

        let mut used_names = HashSet::new();
        for event in events {
            let artifact = CalendarArtifact::from_event(event, template, stamp);
            let ics_content = generate_ics(&artifact)?;

            let path = employee_dir.join(file_name_for(event.date, &mut used_names)?);
            std::fs::write(&path, ics_content)?;
            debug!("Wrote {} ({})", path.display(), artifact.summary);

            written.push(path);
        }
    }

    Ok(written)
}

/// `<date>.ics`, or `<date>-2.ics`, `<date>-3.ics`... when the employee already
/// has a file for that date in this run.
fn file_name_for(date: NaiveDate, used: &mut HashSet<String>) -> ParkingResult<String> {
    let base = date.format(DATE_FORMAT).to_string();

    let candidate = format!("{}.{}", base, ICS_EXTENSION);
    if used.insert(candidate.clone()) {
        return Ok(candidate);
    }

    for n in 2..=100 {
        let candidate = format!("{}-{}.{}", base, n, ICS_EXTENSION);
        if used.insert(candidate.clone()) {
            return Ok(candidate);
        }
    }

    Err(ParkingError::IcsGenerate(format!(
        "Too many reservations on {} for one employee",
        base
    )))
}
