use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gamezone_lib::{Settings, settings_path};

use crate::CliError;

/// Print where settings come from and the effective values.
pub(crate) fn run_config_show(config: Option<&Path>) -> Result<(), CliError> {
    let path = config.map(Path::to_path_buf).unwrap_or_else(settings_path);

    log::info!("{}", "Settings".if_supports_color(Stdout, |t| t.bold()));
    log::info!("");
    if path.exists() {
        log::info!(
            "  File: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  File: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let settings = Settings::load(config)?;
    for line in settings.to_toml_string()?.lines() {
        log::info!("  {}", line);
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path(config: Option<&Path>) {
    let path = config.map(Path::to_path_buf).unwrap_or_else(settings_path);
    log::info!("{}", path.display());
}
