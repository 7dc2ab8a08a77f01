//! Fixed values shared across the pipeline.

/// Date format for roster cells, range bounds and artifact file names.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format embedded in output directory and archive names.
pub const RUN_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Prefix of the per-run directory holding the generated tree.
pub const OUTPUT_DIR_PREFIX: &str = "salida_citas_";

/// Prefix of the per-run archive file.
pub const ARCHIVE_PREFIX: &str = "citas_parking_";

pub const ARCHIVE_EXTENSION: &str = "tar.gz";

pub const ICS_EXTENSION: &str = "ics";

pub const PRODID: &str = "-//parking-ics//EN";

/// Roster file name the command line falls back to.
pub const DEFAULT_ROSTER_FILE: &str = "asignacion_parking.xlsx";
