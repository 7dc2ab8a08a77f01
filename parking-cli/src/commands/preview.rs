use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use parking_core::Pipeline;
use parking_core::date_range::DateRange;

use crate::render::Render;

pub fn run(pipeline: &Pipeline, source: &Path, range: DateRange) -> Result<()> {
    let resolution = pipeline
        .preview(source, &range)
        .with_context(|| format!("Could not read roster {}", source.display()))?;

    println!("{} {}", "Reservations".bold(), range.to_string().dimmed());
    println!("{}", resolution.render());

    Ok(())
}
