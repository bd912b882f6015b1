//! Per-zone work items and their outcomes.

use std::collections::HashSet;
use std::fmt;

use gamezone_core::{PINNED_ZONE_ID, Placeholders, Zone, file_name, sanitize_folder_name};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Name of the hidden marker holding the last mirrored combined hash.
pub const HASH_MARKER: &str = ".hash";

/// One record of `games.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: i64,
    pub name: String,
    pub folder: String,
}

/// Where an entry ended up after processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryStatus {
    /// Content unchanged since the last run
    Skipped,
    /// No previous folder existed
    New,
    /// Previous folder replaced with changed content
    Updated,
    Failed,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::New => "new",
            Self::Updated => "updated",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of processing one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOutcome {
    pub id: i64,
    pub name: String,
    pub folder: String,
    pub status: EntryStatus,
    /// Manifest record, present whenever the entry's folder exists
    pub record: Option<GameRecord>,
    pub error: Option<String>,
    /// Non-fatal problems, e.g. a cover that could not be fetched
    pub warnings: Vec<String>,
}

/// A zone scheduled for mirroring, with its folder already decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorEntry {
    pub id: i64,
    pub name: String,
    pub folder: String,
    /// Document name under the HTML host
    pub html_file: String,
    /// Resolved cover image URL, if the zone has one
    pub cover_url: Option<String>,
}

impl MirrorEntry {
    pub fn record(&self) -> GameRecord {
        GameRecord {
            id: self.id,
            name: self.name.clone(),
            folder: self.folder.clone(),
        }
    }

    pub fn outcome(&self, status: EntryStatus, exists: bool) -> EntryOutcome {
        EntryOutcome {
            id: self.id,
            name: self.name.clone(),
            folder: self.folder.clone(),
            status,
            record: exists.then(|| self.record()),
            error: None,
            warnings: Vec::new(),
        }
    }
}

/// Turn the catalogue into work items.
///
/// The pinned entry is not mirrored, and neither are external zones: their
/// content lives on another site, not on the HTML host. Folder names come
/// from the display name and are unique ignoring ASCII case; a taken name
/// gets `-<id>` appended, then a counter if that is taken too.
pub fn plan_entries(zones: &[Zone], placeholders: &Placeholders) -> Vec<MirrorEntry> {
    let mut used: HashSet<String> = HashSet::new();
    let mut entries = Vec::with_capacity(zones.len());
    for zone in zones {
        if zone.id == PINNED_ZONE_ID {
            continue;
        }
        if zone.is_external() {
            log::debug!("zone {} links to {}, not mirrored", zone.id, zone.url.trim());
            continue;
        }
        let base = sanitize_folder_name(&zone.name, zone.id);
        let folder = claim_folder(&mut used, &base, zone.id);

        let resolved = zone.resolved_url(placeholders);
        let html_file = file_name(&resolved)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}.html", zone.id));
        let cover = zone.cover.trim();
        let cover_url = (!cover.is_empty()).then(|| placeholders.resolve(cover));

        entries.push(MirrorEntry {
            id: zone.id,
            name: zone.name.clone(),
            folder,
            html_file,
            cover_url,
        });
    }
    entries
}

/// First of `base`, `base-<id>`, `base-<id>-2`, ... not yet in `used`.
///
/// `used` holds lowercased names so folders never collide on
/// case-insensitive filesystems.
fn claim_folder(used: &mut HashSet<String>, base: &str, id: i64) -> String {
    let mut candidate = base.to_string();
    let mut n = 1;
    while used.contains(&candidate.to_ascii_lowercase()) {
        n += 1;
        candidate = if n == 2 {
            format!("{base}-{id}")
        } else {
            format!("{base}-{id}-{}", n - 1)
        };
    }
    used.insert(candidate.to_ascii_lowercase());
    candidate
}

/// `hex(sha256(html))` followed by the asset-tree hash, if any.
pub fn combined_hash(html: &[u8], tree_hash: Option<&str>) -> String {
    let html_hash = format!("{:x}", Sha256::digest(html));
    format!("{}{}", html_hash, tree_hash.unwrap_or_default())
}
