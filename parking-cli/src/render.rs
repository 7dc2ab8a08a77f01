//! TUI rendering traits for parking-core types.
//!
//! This module provides extension traits that add colored terminal rendering
//! to parking-core types using owo_colors.

use parking_core::GenerateOutcome;
use parking_core::resolve::{Resolution, ResolvedEvent};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for ResolvedEvent {
    fn render(&self) -> String {
        format!(
            "{} {} {}",
            self.date.format("%a %Y-%m-%d").to_string().dimmed(),
            self.slot.green(),
            self.name
        )
    }
}

/// Above this many files, show the output directory instead of each path
const COMPACT_THRESHOLD: usize = 5;

impl Render for Resolution {
    fn render(&self) -> String {
        if self.is_empty() {
            return "   No reservations in range".dimmed().to_string();
        }

        let mut lines = Vec::new();
        for (code, events) in &self.by_employee {
            let address = events.first().map(|e| e.address.as_str()).unwrap_or_default();
            lines.push(format!("🅿️  {} {}", code.bold(), address.dimmed()));
            for event in events {
                lines.push(format!("   {}", event.render()));
            }
        }

        if self.unresolved > 0 {
            lines.push(String::new());
            lines.push(
                format!(
                    "{} assignment {} with an unknown employee code",
                    self.unresolved,
                    pluralize("cell", self.unresolved)
                )
                .yellow()
                .to_string(),
            );
        }

        lines.join("\n")
    }
}

impl Render for GenerateOutcome {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "{} {} {} for {} {}",
            "✓".green(),
            self.files.len(),
            pluralize("reservation", self.files.len()),
            self.employees,
            pluralize("employee", self.employees)
        )];

        if self.files.len() > COMPACT_THRESHOLD {
            lines.push(format!("   {}", self.output_dir.display().dimmed()));
        } else {
            for file in &self.files {
                lines.push(format!("   {}", file.display().dimmed()));
            }
        }

        if self.unresolved > 0 {
            lines.push(
                format!(
                    "   {} {} skipped (unknown employee code)",
                    self.unresolved,
                    pluralize("cell", self.unresolved)
                )
                .yellow()
                .to_string(),
            );
        }

        lines.push(format!("Archive saved to {}", self.archive_path.display().bold()));
        lines.join("\n")
    }
}

/// Simple pluralization helper
fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
