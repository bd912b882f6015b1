//! Catalogue loading: revision discovery, zone list and popularity windows.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use gamezone_core::{Catalogue, Period, PopularityData, Zone, parse_id_from_path, parse_zones};
use gamezone_lib::Endpoints;

use crate::error::FetchError;
use crate::revision::{catalogue_candidates, discover_revision};
use crate::source::{ContentSource, fetch_json};
use crate::types::FileStat;

/// Builds a fresh [`Catalogue`] from the remote endpoints.
pub struct CatalogueLoader<S> {
    source: Arc<S>,
    endpoints: Endpoints,
}

impl<S: ContentSource> CatalogueLoader<S> {
    pub fn new(source: Arc<S>, endpoints: Endpoints) -> Self {
        Self { source, endpoints }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetch zones and all four popularity windows.
    ///
    /// Only a failure to retrieve the zone list itself is fatal; popularity
    /// failures degrade to zero counts for that window.
    pub async fn load(&self) -> Result<Catalogue, FetchError> {
        let (zones, revision, url) = self.fetch_zones().await?;
        let popularity = self.fetch_popularity().await;
        log::debug!(
            "catalogue loaded from {} ({} zones, revision {})",
            url,
            zones.len(),
            revision.as_deref().unwrap_or("unknown"),
        );
        Ok(Catalogue::new(zones, popularity, revision, url))
    }

    /// Resolve the catalogue URL and fetch the zone list.
    ///
    /// Returns the zones, the discovered revision and the URL that answered.
    pub async fn fetch_zones(&self) -> Result<(Vec<Zone>, Option<String>, String), FetchError> {
        let revision = discover_revision(self.source.as_ref(), &self.endpoints).await;
        let candidates = catalogue_candidates(&self.endpoints, revision.as_deref());

        for url in &candidates {
            let body = match self.source.get_text(url).await {
                Ok(body) => body,
                Err(e) => {
                    log::debug!("catalogue candidate {} failed: {}", url, e);
                    continue;
                }
            };
            match parse_zones(&body) {
                Ok((zones, dropped)) => {
                    if dropped > 0 {
                        log::warn!("Skipped {} malformed catalogue entries", dropped);
                    }
                    return Ok((zones, revision, url.clone()));
                }
                Err(e) => log::debug!("catalogue candidate {} unusable: {}", url, e),
            }
        }
        Err(FetchError::Catalogue { tried: candidates })
    }

    /// All four windows, fetched concurrently. A failed window is empty.
    pub async fn fetch_popularity(&self) -> PopularityData {
        let windows = join_all(Period::all().iter().map(|&period| async move {
            let counts = match self.fetch_window(period).await {
                Ok(counts) => counts,
                Err(e) => {
                    log::debug!("popularity window '{}' unavailable: {}", period, e);
                    HashMap::new()
                }
            };
            (period, counts)
        }))
        .await;

        let mut data = PopularityData::new();
        for (period, counts) in windows {
            data.insert_window(period, counts);
        }
        data
    }

    /// Hit counts per zone id for one window.
    pub async fn fetch_window(&self, period: Period) -> Result<HashMap<i64, u64>, FetchError> {
        let url = format!(
            "{}/files?period={}",
            self.endpoints.stats_base.trim_end_matches('/'),
            period
        );
        let files: Vec<FileStat> = fetch_json(self.source.as_ref(), &url).await?;
        let mut counts = HashMap::new();
        for file in files {
            if let Some(id) = parse_id_from_path(&file.name) {
                *counts.entry(id).or_insert(0) += file.hits.total;
            }
        }
        Ok(counts)
    }
}

#[cfg(test)]
#[path = "tests/loader_tests.rs"]
mod tests;
