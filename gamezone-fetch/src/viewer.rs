//! Zone viewer: resolve a selection, build shareable links, pop out and
//! download the zone document.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use gamezone_core::{Placeholders, Zone, sanitize_folder_name};
use reqwest::Url;

use crate::error::FetchError;
use crate::source::ContentSource;

/// Query parameter carrying the selected zone id.
pub const ZONE_QUERY_PARAM: &str = "id";

/// Directory under the system temp dir that holds popped-out documents.
const POP_OUT_DIR: &str = "gamezone-popout";

/// What selecting a zone leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneTarget {
    /// Absolute link to another site, opened in a new tab
    External(String),
    /// Document fetched for the embedded viewer
    Inline { url: String, html: String },
}

/// Visible metadata for the selected zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneDetails {
    pub id: i64,
    pub name: String,
    pub author: Option<String>,
    pub author_link: Option<String>,
    pub share_link: String,
}

/// Replace (or add) the zone id in a page URL's query string.
///
/// Other parameters are preserved; an existing `id` is overwritten rather
/// than duplicated.
pub fn share_link(page_url: &str, id: i64) -> Result<String, FetchError> {
    let mut url = Url::parse(page_url).map_err(|e| FetchError::InvalidUrl {
        url: page_url.to_string(),
        message: e.to_string(),
    })?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != ZONE_QUERY_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(ZONE_QUERY_PARAM, &id.to_string());
    Ok(url.into())
}

/// Zone id carried by a shared link, if any.
pub fn zone_id_from_link(link: &str) -> Option<i64> {
    let url = Url::parse(link).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == ZONE_QUERY_PARAM)
        .and_then(|(_, v)| v.parse().ok())
}

/// Opens zones on behalf of one interactive session.
///
/// Only the most recent selection counts: if another `open` starts while a
/// fetch is in flight, the older result is discarded.
pub struct Viewer<S> {
    source: Arc<S>,
    placeholders: Placeholders,
    page_url: String,
    generation: AtomicU64,
}

impl<S: ContentSource> Viewer<S> {
    pub fn new(source: Arc<S>, placeholders: Placeholders, page_url: impl Into<String>) -> Self {
        Self {
            source,
            placeholders,
            page_url: page_url.into(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn details(&self, zone: &Zone) -> Result<ZoneDetails, FetchError> {
        Ok(ZoneDetails {
            id: zone.id,
            name: zone.name.clone(),
            author: zone.author.clone(),
            author_link: zone.author_link.clone(),
            share_link: share_link(&self.page_url, zone.id)?,
        })
    }

    /// Resolve a selection.
    ///
    /// Returns `Ok(None)` when a newer selection superseded this one while
    /// its document was being fetched.
    pub async fn open(&self, zone: &Zone) -> Result<Option<ZoneTarget>, FetchError> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if zone.is_external() {
            return Ok(Some(ZoneTarget::External(zone.url.trim().to_string())));
        }
        let url = zone.resolved_url(&self.placeholders);
        let html = self.source.get_text(&url).await?;
        if self.generation.load(Ordering::SeqCst) != ticket {
            log::debug!("discarding superseded load of zone {}", zone.id);
            return Ok(None);
        }
        Ok(Some(ZoneTarget::Inline { url, html }))
    }

    /// Raw document of a non-external zone.
    pub async fn fetch_html(&self, zone: &Zone) -> Result<String, FetchError> {
        if zone.is_external() {
            return Err(FetchError::External(zone.url.clone()));
        }
        self.source.get_text(&zone.resolved_url(&self.placeholders)).await
    }

    /// Fetch the raw document and save it with [`save_html`].
    pub async fn download(&self, zone: &Zone, dir: &Path) -> Result<PathBuf, FetchError> {
        let html = self.fetch_html(zone).await?;
        save_html(dir, zone, &html).await
    }
}

/// Save an already fetched document as `<name>.html` in `dir`.
pub async fn save_html(dir: &Path, zone: &Zone, html: &str) -> Result<PathBuf, FetchError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{}.html", sanitize_folder_name(&zone.name, zone.id)));
    tokio::fs::write(&path, html).await?;
    Ok(path)
}

/// Write a document to a standalone file so it can be opened on its own.
pub fn pop_out(zone: &Zone, html: &str) -> Result<PathBuf, FetchError> {
    pop_out_in(&std::env::temp_dir().join(POP_OUT_DIR), zone, html)
}

/// [`pop_out`] into an explicit directory.
pub fn pop_out_in(dir: &Path, zone: &Zone, html: &str) -> Result<PathBuf, FetchError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("zone-{}.html", zone.id));
    std::fs::write(&path, html)?;
    Ok(path)
}

#[cfg(test)]
#[path = "tests/viewer_tests.rs"]
mod tests;
