//! A full mirror run.
//!
//! The catalogue is fetched and planned up front, the asset repository is
//! synced and hashed once, then entries are processed on a fixed-size
//! worker pool. Outcomes come back over the pool's result channel and are
//! only reconciled into `games.json` after every worker has finished.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gamezone_fetch::{CatalogueLoader, ContentSource};
use gamezone_lib::settings::DEFAULT_JOBS;
use gamezone_lib::{Endpoints, RetryPolicy, Settings, WorkerPool};
use tokio::sync::mpsc;

use crate::assets::{AssetRepo, asset_files, tree_hashes};
use crate::compress::{gzip_bytes, gzip_in_place, is_html, is_text_asset, rewrite_base_href};
use crate::entry::{
    EntryOutcome, EntryStatus, GameRecord, HASH_MARKER, MirrorEntry, combined_hash, plan_entries,
};
use crate::error::MirrorError;
use crate::log::{LogSummary, MirrorLog};
use crate::manifest::write_manifest;

/// Compressed zone document inside each game folder.
pub const INDEX_FILE: &str = "index.html.gz";

/// Cover image inside each game folder, stored uncompressed.
pub const COVER_FILE: &str = "cover.png";

/// Options for a mirror run.
#[derive(Debug, Clone)]
pub struct MirrorOptions {
    /// Directory receiving one folder per game plus `games.json`
    pub output_dir: PathBuf,
    /// Worker pool size
    pub jobs: usize,
    /// Applied to every network fetch
    pub retry: RetryPolicy,
    /// Asset repository; `None` mirrors documents and covers only
    pub assets: Option<AssetRepo>,
    /// Clone or update the asset repository before hashing it
    pub sync_assets: bool,
    /// Disable the run log file
    pub no_log: bool,
}

impl MirrorOptions {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            jobs: DEFAULT_JOBS,
            retry: RetryPolicy::default(),
            assets: None,
            sync_assets: true,
            no_log: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            output_dir: settings.mirror.output_dir.clone(),
            jobs: settings.mirror.jobs,
            retry: settings.retry.policy(),
            assets: Some(AssetRepo::from_settings(&settings.mirror)),
            sync_assets: true,
            no_log: false,
        }
    }
}

/// Progress events emitted during a run, consumed by the CLI.
#[derive(Debug, Clone)]
pub enum MirrorEvent {
    LoadingCatalogue,
    CatalogueLoaded {
        total: usize,
        revision: Option<String>,
    },
    /// Every catalogue candidate failed; the run continues with no entries.
    CatalogueFailed { message: String },
    SyncingAssets,
    AssetsReady { zones: usize },
    /// Asset sync failed; the run continues without assets.
    AssetsUnavailable { message: String },
    EntryStarted { id: i64, name: String },
    EntryFinished(EntryOutcome),
    ManifestWritten { path: PathBuf, records: usize },
    Done,
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct MirrorReport {
    /// One outcome per planned entry, sorted by id
    pub outcomes: Vec<EntryOutcome>,
    pub manifest_path: PathBuf,
    pub log_path: Option<PathBuf>,
    /// Set when the catalogue could not be fetched
    pub catalogue_error: Option<String>,
}

impl MirrorReport {
    pub fn summary(&self) -> LogSummary {
        let mut log = MirrorLog::new();
        for outcome in &self.outcomes {
            log.add(outcome.clone());
        }
        log.summary()
    }

    pub fn status_of(&self, id: i64) -> Option<EntryStatus> {
        self.outcomes.iter().find(|o| o.id == id).map(|o| o.status)
    }
}

/// Mirror the whole catalogue into `options.output_dir`.
///
/// Only an unusable output directory is an error. Catalogue, asset and
/// per-entry failures are reported in the returned [`MirrorReport`] and
/// still produce a (possibly empty) `games.json`.
pub async fn run_mirror<S: ContentSource + 'static>(
    source: Arc<S>,
    endpoints: &Endpoints,
    options: &MirrorOptions,
    events: mpsc::UnboundedSender<MirrorEvent>,
) -> Result<MirrorReport, MirrorError> {
    std::fs::create_dir_all(&options.output_dir).map_err(|e| MirrorError::OutputDir {
        path: options.output_dir.clone(),
        source: e,
    })?;
    let mut run_log = MirrorLog::new();

    // Catalogue
    let _ = events.send(MirrorEvent::LoadingCatalogue);
    let loader = CatalogueLoader::new(source.clone(), endpoints.clone());
    let mut catalogue_error = None;
    let entries = match options.retry.run("catalogue", |_| loader.fetch_zones()).await {
        Ok((zones, revision, url)) => {
            log::debug!("mirroring catalogue from {}", url);
            let entries = plan_entries(&zones, &endpoints.placeholders());
            let _ = events.send(MirrorEvent::CatalogueLoaded {
                total: entries.len(),
                revision,
            });
            entries
        }
        Err(e) => {
            let message = e.to_string();
            log::error!("{}", message);
            run_log.note(format!("catalogue unavailable: {}", message));
            let _ = events.send(MirrorEvent::CatalogueFailed {
                message: message.clone(),
            });
            catalogue_error = Some(message);
            Vec::new()
        }
    };

    // Assets, hashed once before any worker starts
    let (asset_root, hashes) = match &options.assets {
        Some(repo) if !entries.is_empty() => {
            prepare_assets(repo, options.sync_assets, &events, &mut run_log).await
        }
        _ => (None, HashMap::new()),
    };

    // Workers
    let ctx = Arc::new(EntryContext {
        source,
        html_base: endpoints.html_base.trim_end_matches('/').to_string(),
        output_dir: options.output_dir.clone(),
        asset_root,
        hashes,
        retry: options.retry,
        events: events.clone(),
    });
    let mut pool = WorkerPool::start(options.jobs, entries, move |entry| {
        let ctx = ctx.clone();
        async move { ctx.process(entry).await }
    });
    log::debug!("mirroring with {} workers", pool.workers());

    let mut outcomes = Vec::new();
    while let Some(outcome) = pool.recv().await {
        let _ = events.send(MirrorEvent::EntryFinished(outcome.clone()));
        outcomes.push(outcome);
    }
    outcomes.extend(pool.join().await);
    outcomes.sort_by_key(|o| o.id);

    // Reconcile
    let records: Vec<GameRecord> = outcomes.iter().filter_map(|o| o.record.clone()).collect();
    let manifest_path = write_manifest(&options.output_dir, &records)?;
    let _ = events.send(MirrorEvent::ManifestWritten {
        path: manifest_path.clone(),
        records: records.len(),
    });

    for outcome in &outcomes {
        run_log.add(outcome.clone());
    }
    let log_path = if options.no_log {
        None
    } else {
        let path = MirrorLog::default_path(&options.output_dir);
        match run_log.write_to_file(&path) {
            Ok(()) => Some(path),
            Err(e) => {
                log::warn!("Could not write mirror log {}: {}", path.display(), e);
                None
            }
        }
    };

    let _ = events.send(MirrorEvent::Done);
    Ok(MirrorReport {
        outcomes,
        manifest_path,
        log_path,
        catalogue_error,
    })
}

/// Sync the repository if asked, then build the id → tree hash table.
async fn prepare_assets(
    repo: &AssetRepo,
    sync: bool,
    events: &mpsc::UnboundedSender<MirrorEvent>,
    run_log: &mut MirrorLog,
) -> (Option<PathBuf>, HashMap<i64, String>) {
    if sync {
        let _ = events.send(MirrorEvent::SyncingAssets);
        if let Err(e) = repo.sync().await {
            if repo.has_checkout() {
                log::warn!("Asset sync failed, using the existing checkout: {}", e);
                run_log.note(format!("asset sync failed, existing checkout used: {}", e));
            } else {
                log::warn!("Asset sync failed, mirroring without assets: {}", e);
                run_log.note(format!("asset sync failed: {}", e));
                let _ = events.send(MirrorEvent::AssetsUnavailable {
                    message: e.to_string(),
                });
                return (None, HashMap::new());
            }
        }
    }

    let root = repo.checkout_dir.clone();
    let walk_root = root.clone();
    match tokio::task::spawn_blocking(move || tree_hashes(&walk_root)).await {
        Ok(hashes) => {
            let _ = events.send(MirrorEvent::AssetsReady {
                zones: hashes.len(),
            });
            (Some(root), hashes)
        }
        Err(e) => {
            log::warn!("Asset hashing failed, mirroring without assets: {}", e);
            run_log.note(format!("asset hashing failed: {}", e));
            (None, HashMap::new())
        }
    }
}

/// Read-only state shared by every worker.
struct EntryContext<S> {
    source: Arc<S>,
    html_base: String,
    output_dir: PathBuf,
    asset_root: Option<PathBuf>,
    hashes: HashMap<i64, String>,
    retry: RetryPolicy,
    events: mpsc::UnboundedSender<MirrorEvent>,
}

impl<S: ContentSource> EntryContext<S> {
    async fn process(&self, entry: MirrorEntry) -> EntryOutcome {
        let _ = self.events.send(MirrorEvent::EntryStarted {
            id: entry.id,
            name: entry.name.clone(),
        });
        let folder = self.output_dir.join(&entry.folder);
        let existed = folder.is_dir();

        let url = format!("{}/{}", self.html_base, entry.html_file);
        let what = format!("zone {} document", entry.id);
        let html = match self.retry.run(&what, |_| self.source.get_bytes(&url)).await {
            Ok(html) => html,
            Err(e) => {
                log::warn!("Zone {} ({}) failed: {}", entry.id, entry.name, e);
                let mut outcome = entry.outcome(EntryStatus::Failed, existed);
                outcome.error = Some(e.to_string());
                return outcome;
            }
        };

        let hash = combined_hash(&html, self.hashes.get(&entry.id).map(String::as_str));
        if existed && read_marker(&folder).as_deref() == Some(hash.as_str()) {
            log::debug!("zone {} unchanged", entry.id);
            return entry.outcome(EntryStatus::Skipped, true);
        }
        let status = if existed {
            EntryStatus::Updated
        } else {
            EntryStatus::New
        };

        let mut warnings = Vec::new();
        let cover = match &entry.cover_url {
            Some(cover_url) if !folder.join(COVER_FILE).exists() => {
                let what = format!("zone {} cover", entry.id);
                match self.retry.run(&what, |_| self.source.get_bytes(cover_url)).await {
                    Ok(bytes) => Some(bytes),
                    Err(e) => {
                        log::debug!("zone {} cover unavailable: {}", entry.id, e);
                        warnings.push(format!("cover not fetched: {}", e));
                        None
                    }
                }
            }
            _ => None,
        };

        let job = WriteJob {
            folder: folder.clone(),
            html,
            cover,
            asset_dir: self
                .asset_root
                .as_ref()
                .map(|root| root.join(entry.id.to_string())),
            hash,
        };
        let written = tokio::task::spawn_blocking(move || job.write())
            .await
            .map_err(MirrorError::from)
            .and_then(|r| r.map_err(MirrorError::from));

        match written {
            Ok(assets) => {
                log::debug!("zone {} {} ({} assets)", entry.id, status, assets);
                let mut outcome = entry.outcome(status, true);
                outcome.warnings = warnings;
                outcome
            }
            Err(e) => {
                log::warn!("Zone {} ({}) could not be written: {}", entry.id, entry.name, e);
                let mut outcome = entry.outcome(EntryStatus::Failed, folder.is_dir());
                outcome.error = Some(e.to_string());
                outcome.warnings = warnings;
                outcome
            }
        }
    }
}

/// Stored combined hash of a previous run, if any.
fn read_marker(folder: &Path) -> Option<String> {
    std::fs::read_to_string(folder.join(HASH_MARKER))
        .ok()
        .map(|s| s.trim().to_string())
}

/// Filesystem half of an entry, run on the blocking pool.
struct WriteJob {
    folder: PathBuf,
    html: Vec<u8>,
    cover: Option<Vec<u8>>,
    asset_dir: Option<PathBuf>,
    hash: String,
}

impl WriteJob {
    /// Returns the number of asset files copied. The hash marker is written
    /// last so an interrupted write is redone on the next run.
    fn write(self) -> io::Result<usize> {
        std::fs::create_dir_all(&self.folder)?;

        let html = String::from_utf8_lossy(&self.html);
        let html = rewrite_base_href(&html);
        std::fs::write(self.folder.join(INDEX_FILE), gzip_bytes(html.as_bytes())?)?;

        let mut copied = 0;
        if let Some(dir) = self.asset_dir.as_deref().filter(|d| d.is_dir()) {
            for (rel, src) in asset_files(dir) {
                let dest = self.folder.join(&rel);
                if let Some(parent) = dest.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::copy(&src, &dest)?;
                if is_html(&dest) {
                    let raw = std::fs::read(&dest)?;
                    let text = String::from_utf8_lossy(&raw);
                    if let Cow::Owned(fixed) = rewrite_base_href(&text) {
                        std::fs::write(&dest, fixed)?;
                    }
                }
                if is_text_asset(&dest) {
                    gzip_in_place(&dest)?;
                }
                copied += 1;
            }
        }

        if let Some(cover) = &self.cover {
            std::fs::write(self.folder.join(COVER_FILE), cover)?;
        }
        std::fs::write(self.folder.join(HASH_MARKER), &self.hash)?;
        Ok(copied)
    }
}

#[cfg(test)]
#[path = "tests/mirror_tests.rs"]
mod tests;
