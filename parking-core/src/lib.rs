//! Core of parking-ics: turns a weekly parking roster workbook into one
//! calendar reservation per employee per assigned day, packed in an archive.
//!
//! The stages, in order:
//! - `roster`: read the employee directory and the assignments grid
//! - `resolve`: keep in-range rows and match codes to employees
//! - `artifact` / `ics`: write `<code>/<date>.ics` files
//! - `archive`: pack the tree into a .tar.gz
//!
//! `pipeline` runs them in sequence.

pub mod archive;
pub mod artifact;
pub mod config;
pub mod constants;
pub mod date_range;
pub mod error;
pub mod ics;
pub mod pipeline;
pub mod resolve;
pub mod roster;

pub use error::{ParkingError, ParkingResult};
pub use pipeline::{GenerateOutcome, GenerateRequest, Pipeline, run, run_with};
