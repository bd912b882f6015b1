//! All-time statistics from the paged endpoint.
//!
//! This is a separate source from the popularity windows used for sorting:
//! it always queries the yearly period, page by page, and also accumulates
//! bandwidth. The result is fetched once per client and kept for the life
//! of the process.

use std::collections::HashMap;
use std::sync::Arc;

use gamezone_core::parse_id_from_path;
use tokio::sync::OnceCell;

use crate::source::{ContentSource, fetch_json};
use crate::types::{FileStat, ZoneStats};

/// Entries requested per page.
pub const PAGE_LIMIT: usize = 100;

/// Hard stop in case the endpoint never returns an empty page.
const MAX_PAGES: usize = 1000;

/// Accumulated all-time counters per zone id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllTimeStats {
    entries: HashMap<i64, ZoneStats>,
    pages: usize,
}

impl AllTimeStats {
    pub fn get(&self, id: i64) -> ZoneStats {
        self.entries.get(&id).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pages that returned data.
    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn total_hits(&self) -> u64 {
        self.entries.values().map(|s| s.hits).sum()
    }

    pub fn total_bandwidth(&self) -> u64 {
        self.entries.values().map(|s| s.bandwidth).sum()
    }

    /// Ids ordered by hits, highest first.
    pub fn ranked(&self) -> Vec<(i64, ZoneStats)> {
        let mut ranked: Vec<(i64, ZoneStats)> = self.entries.iter().map(|(&id, &s)| (id, s)).collect();
        ranked.sort_by(|a, b| b.1.hits.cmp(&a.1.hits).then(a.0.cmp(&b.0)));
        ranked
    }

    fn add_page(&mut self, files: Vec<FileStat>) {
        self.pages += 1;
        for file in files {
            if let Some(id) = parse_id_from_path(&file.name) {
                let entry = self.entries.entry(id).or_default();
                entry.hits += file.hits.total;
                entry.bandwidth += file.bandwidth.total;
            }
        }
    }
}

/// Client for the paged statistics endpoint with a process-lifetime cache.
pub struct StatsClient<S> {
    source: Arc<S>,
    stats_base: String,
    cache: OnceCell<AllTimeStats>,
}

impl<S: ContentSource> StatsClient<S> {
    pub fn new(source: Arc<S>, stats_base: impl Into<String>) -> Self {
        Self {
            source,
            stats_base: stats_base.into().trim_end_matches('/').to_string(),
            cache: OnceCell::new(),
        }
    }

    /// All-time statistics, fetched on first use.
    ///
    /// Paging stops at the first empty or unreadable page, so this never
    /// fails; an unreachable endpoint yields empty statistics.
    pub async fn all_time(&self) -> &AllTimeStats {
        self.cache.get_or_init(|| self.fetch_all_pages()).await
    }

    fn page_url(&self, page: usize) -> String {
        format!(
            "{}/files?period=year&page={}&limit={}",
            self.stats_base, page, PAGE_LIMIT
        )
    }

    async fn fetch_all_pages(&self) -> AllTimeStats {
        let mut stats = AllTimeStats::default();
        for page in 1..=MAX_PAGES {
            let url = self.page_url(page);
            match fetch_json::<_, Vec<FileStat>>(self.source.as_ref(), &url).await {
                Ok(files) if !files.is_empty() => stats.add_page(files),
                Ok(_) => break,
                Err(e) => {
                    log::debug!("stats paging stopped at page {}: {}", page, e);
                    break;
                }
            }
            if page == MAX_PAGES {
                log::warn!("Stats endpoint returned {} pages; stopping", MAX_PAGES);
            }
        }
        stats
    }
}
