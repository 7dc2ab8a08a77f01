//! ICS file generation.

use icalendar::{Calendar, Component, EventLike};

use crate::artifact::CalendarArtifact;
use crate::constants::PRODID;
use crate::error::{ParkingError, ParkingResult};

/// Floating local time: no `Z`, no TZID
const FLOATING_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Reservations are always confirmed and never block the recipient's time
const STATUS: &str = "CONFIRMED";
const TRANSP: &str = "TRANSPARENT";

/// Generate .ics content for a single reservation
pub fn generate_ics(artifact: &CalendarArtifact) -> ParkingResult<String> {
    if artifact.end <= artifact.start {
        return Err(ParkingError::IcsGenerate(format!(
            "event '{}' ends before it starts",
            artifact.summary
        )));
    }

    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&artifact.uid);
    ics_event.summary(&artifact.summary);

    // DTSTAMP is required by RFC 5545; use the run time so one run is uniform
    let dtstamp = artifact.stamp.format("%Y%m%dT%H%M%SZ").to_string();
    ics_event.add_property("DTSTAMP", &dtstamp);

    ics_event.add_property("DTSTART", artifact.start.format(FLOATING_FORMAT).to_string());
    ics_event.add_property("DTEND", artifact.end.format(FLOATING_FORMAT).to_string());

    ics_event.location(&artifact.location);
    ics_event.description(&artifact.description);

    ics_event.add_property("STATUS", STATUS);
    ics_event.add_property("TRANSP", TRANSP);

    let ics_event = ics_event.done();
    cal.push(ics_event);
    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string()))
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with our own
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
