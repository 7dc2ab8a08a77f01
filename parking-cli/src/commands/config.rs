use anyhow::Result;
use owo_colors::OwoColorize;
use parking_core::config::ParkingConfig;

pub fn run(config: &ParkingConfig, source: Option<&std::path::Path>) -> Result<()> {
    let default_path = ParkingConfig::config_path()?;

    println!("{}", "Paths".bold());
    match source {
        Some(path) => println!("  Config:  {}", path.display()),
        None => println!(
            "  Config:  {} {}",
            default_path.display(),
            if default_path.exists() { "" } else { "(not found, using defaults)" }.dimmed()
        ),
    }

    println!();
    println!("{}", "Effective configuration".bold());
    print!("{}", config.to_toml()?);

    Ok(())
}
