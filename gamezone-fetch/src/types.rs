//! Response shapes of the revision and statistics endpoints.

use serde::Deserialize;

/// One element of the `/commits` listing. Only the hash is used.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
}

/// A `{ total }` counter object.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Counter {
    #[serde(default)]
    pub total: u64,
}

/// One file entry from the statistics endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct FileStat {
    /// Path such as `/123.html`
    pub name: String,
    #[serde(default)]
    pub hits: Counter,
    #[serde(default)]
    pub bandwidth: Counter,
}

/// All-time counters for one zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneStats {
    pub hits: u64,
    /// Bytes served
    pub bandwidth: u64,
}
