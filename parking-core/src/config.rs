//! Tool configuration.
//!
//! Everything has a default, so the config file is optional. The file lives
//! at ~/.config/parking-ics/config.toml unless a path is given explicitly.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveTime};
use ::config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::artifact::EventTemplate;
use crate::error::{ParkingError, ParkingResult};

/// What to do with an assignment cell whose code is not in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Drop the cell silently
    #[default]
    Skip,
    /// Drop the cell and log a warning
    Warn,
    /// Abort the run
    Fail,
}

/// How much of an assignment goes into the event UID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UidScope {
    /// `<address>@<domain>`: one UID per employee
    #[default]
    Employee,
    /// `<date>-<slot>-<address>@<domain>`: one UID per reservation
    Event,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkingConfig {
    pub employees_sheet: String,
    pub assignments_sheet: String,
    pub unresolved_codes: UnresolvedPolicy,
    pub event: EventSettings,
}

impl Default for ParkingConfig {
    fn default() -> Self {
        ParkingConfig {
            employees_sheet: "Employees".to_string(),
            assignments_sheet: "Assignments".to_string(),
            unresolved_codes: UnresolvedPolicy::default(),
            event: EventSettings::default(),
        }
    }
}

/// The `[event]` table: fixed fields stamped on every reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    pub marker: String,
    pub location: String,
    pub description: String,
    /// Local wall-clock start, HH:MM
    pub start_time: String,
    pub duration_minutes: u32,
    pub uid_domain: String,
    pub uid_scope: UidScope,
}

impl Default for EventSettings {
    fn default() -> Self {
        EventSettings {
            marker: "PARKING".to_string(),
            location: "Parking empresa".to_string(),
            description: "Reserva automática de plaza de parking".to_string(),
            start_time: "08:00".to_string(),
            duration_minutes: 5,
            uid_domain: "parking.com".to_string(),
            uid_scope: UidScope::default(),
        }
    }
}

impl ParkingConfig {
    pub fn config_path() -> ParkingResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ParkingError::Config("Could not determine config directory".into()))?
            .join("parking-ics");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, falling back to defaults if absent.
    pub fn load() -> ParkingResult<Self> {
        Self::load_file(&Self::config_path()?, false)
    }

    /// Load from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> ParkingResult<Self> {
        Self::load_file(path, true)
    }

    fn load_file(path: &Path, required: bool) -> ParkingResult<Self> {
        let config: ParkingConfig = Config::builder()
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .build()
            .map_err(|e| ParkingError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ParkingError::Config(e.to_string()))?;

        config.event_template()?;
        Ok(config)
    }

    /// Typed view of the `[event]` table.
    pub fn event_template(&self) -> ParkingResult<EventTemplate> {
        let settings = &self.event;

        let start_time = NaiveTime::parse_from_str(settings.start_time.trim(), "%H:%M")
            .map_err(|_| {
                ParkingError::Config(format!(
                    "event.start_time '{}' is not HH:MM",
                    settings.start_time
                ))
            })?;

        if settings.duration_minutes == 0 {
            return Err(ParkingError::Config(
                "event.duration_minutes must be at least 1".into(),
            ));
        }

        Ok(EventTemplate {
            marker: settings.marker.clone(),
            location: settings.location.clone(),
            description: settings.description.clone(),
            start_time,
            duration: Duration::minutes(i64::from(settings.duration_minutes)),
            uid_domain: settings.uid_domain.clone(),
            uid_scope: settings.uid_scope,
        })
    }

    pub fn to_toml(&self) -> ParkingResult<String> {
        toml::to_string_pretty(self).map_err(|e| ParkingError::Config(e.to_string()))
    }
}
