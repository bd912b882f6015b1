use std::sync::Arc;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gamezone_fetch::HttpSource;
use gamezone_lib::Settings;

use crate::CliError;
use crate::commands::load_catalogue;

/// Print every tag with the number of zones carrying it.
pub(crate) async fn run_tags(settings: &Settings, quiet: bool) -> Result<(), CliError> {
    let source = Arc::new(HttpSource::new()?);
    let catalogue = load_catalogue(source, settings, quiet).await?;

    if catalogue.tags().is_empty() {
        log::info!("No tags in the catalogue");
        return Ok(());
    }
    log::info!("{}", "Tags".if_supports_color(Stdout, |t| t.bold()));
    for tag in catalogue.tags() {
        let count = catalogue.zones().iter().filter(|z| z.has_tag(tag)).count();
        log::info!(
            "  {} {}",
            tag.if_supports_color(Stdout, |t| t.cyan()),
            format!("({})", count).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}
