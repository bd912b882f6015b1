//! Bulk mirror downloader for the zone catalogue.
//!
//! Output layout: one folder per game holding `index.html.gz`, compressed
//! text assets, an uncompressed `cover.png` and a hidden `.hash` marker,
//! plus a top-level `games.json`.

pub mod assets;
pub mod compress;
pub mod entry;
pub mod error;
pub mod log;
pub mod manifest;
pub mod mirror;

pub use assets::{AssetRepo, tree_hashes, zone_tree_hash};
pub use entry::{EntryOutcome, EntryStatus, GameRecord, MirrorEntry, combined_hash, plan_entries};
pub use error::MirrorError;
pub use log::{LogSummary, MirrorLog};
pub use manifest::{MANIFEST_FILE, read_manifest, write_manifest};
pub use mirror::{MirrorEvent, MirrorOptions, MirrorReport, run_mirror};
