use std::collections::HashMap;
use std::sync::Arc;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gamezone_fetch::{CatalogueLoader, HttpSource, StatsClient};
use gamezone_lib::Settings;
use gamezone_lib::util::{format_bytes, format_count};

use crate::CliError;
use crate::spinner;

/// Print all-time hits and bandwidth, for one zone or the top `top`.
pub(crate) async fn run_stats(
    settings: &Settings,
    id: Option<i64>,
    top: usize,
    quiet: bool,
) -> Result<(), CliError> {
    let source = Arc::new(HttpSource::new()?);
    let client = StatsClient::new(source.clone(), settings.endpoints.stats_base.clone());
    let loader = CatalogueLoader::new(source, settings.endpoints.clone());

    let pb = spinner::single("Fetching statistics...", quiet);
    let (stats, zones) = tokio::join!(client.all_time(), loader.fetch_zones());
    pb.finish_and_clear();

    // Names are cosmetic; fall back to bare ids without a catalogue.
    let names: HashMap<i64, String> = match zones {
        Ok((zones, _, _)) => zones.into_iter().map(|z| (z.id, z.name)).collect(),
        Err(e) => {
            log::debug!("no catalogue for stats names: {}", e);
            HashMap::new()
        }
    };
    let name_of = |id: i64| names.get(&id).cloned().unwrap_or_else(|| format!("#{}", id));

    if let Some(id) = id {
        let entry = stats.get(id);
        log::info!("{}", name_of(id).if_supports_color(Stdout, |t| t.bold()));
        log::info!("  Hits:      {}", format_count(entry.hits));
        log::info!("  Bandwidth: {}", format_bytes(entry.bandwidth));
        return Ok(());
    }

    if stats.is_empty() {
        log::warn!("No statistics available");
        return Ok(());
    }

    log::info!(
        "{} {}",
        "All-time statistics".if_supports_color(Stdout, |t| t.bold()),
        format!("({} zones, {} pages)", stats.len(), stats.pages())
            .if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("  Hits:      {}", format_count(stats.total_hits()));
    log::info!("  Bandwidth: {}", format_bytes(stats.total_bandwidth()));
    log::info!("");

    for (rank, (id, entry)) in stats.ranked().into_iter().take(top).enumerate() {
        log::info!(
            "  {:>3}. {:<32} {:>10} hits  {:>10}",
            rank + 1,
            name_of(id),
            format_count(entry.hits),
            format_bytes(entry.bandwidth).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}
