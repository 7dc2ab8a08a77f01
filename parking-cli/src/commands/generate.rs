use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use parking_core::{GenerateRequest, Pipeline};
use tracing::debug;

use crate::render::Render;
use crate::utils::tui::create_spinner;

pub fn run(pipeline: &Pipeline, request: GenerateRequest) -> Result<()> {
    println!(
        "Generating reservations for {} from {}",
        request.range.to_string().bold(),
        request.source.display()
    );

    debug!(?request, "Starting run");

    let spinner = create_spinner("Writing calendar files...".to_string());
    let result = pipeline.generate(&request);
    spinner.finish_and_clear();

    let outcome = result.with_context(|| {
        format!(
            "Could not generate reservations from {}",
            request.source.display()
        )
    })?;

    if outcome.files.is_empty() {
        println!(
            "{}",
            format!("No assignments between {}", request.range).yellow()
        );
    }

    println!("{}", outcome.render());

    Ok(())
}
