//! ICS file generation.
//!
//! Each reservation becomes a standalone RFC 5545 document with one VEVENT.

mod generate;

pub use generate::generate_ics;
