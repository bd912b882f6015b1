pub(crate) mod config;
pub(crate) mod list;
pub(crate) mod mirror;
pub(crate) mod show;
pub(crate) mod stats;
pub(crate) mod tags;

use std::sync::Arc;

use gamezone_core::Catalogue;
use gamezone_fetch::{CatalogueLoader, HttpSource};
use gamezone_lib::Settings;

use crate::CliError;
use crate::spinner;

/// Fetch the catalogue and popularity windows behind a spinner.
pub(crate) async fn load_catalogue(
    source: Arc<HttpSource>,
    settings: &Settings,
    quiet: bool,
) -> Result<Catalogue, CliError> {
    let loader = CatalogueLoader::new(source, settings.endpoints.clone());
    let pb = spinner::single("Loading catalogue...", quiet);
    let result = loader.load().await;
    pb.finish_and_clear();

    let catalogue = result?;
    log::debug!(
        "{} zones from {} (revision {})",
        catalogue.len(),
        catalogue.source_url(),
        catalogue.revision().unwrap_or("unknown"),
    );
    Ok(catalogue)
}
