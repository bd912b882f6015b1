//! The top-level `games.json` manifest.

use std::path::{Path, PathBuf};

use crate::entry::GameRecord;

pub const MANIFEST_FILE: &str = "games.json";

/// Write records sorted by id. An empty slice still writes `[]`.
pub fn write_manifest(output_dir: &Path, records: &[GameRecord]) -> Result<PathBuf, crate::MirrorError> {
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|r| r.id);
    let path = output_dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(&sorted)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, &path)?;
    Ok(path)
}

pub fn read_manifest(output_dir: &Path) -> Result<Vec<GameRecord>, crate::MirrorError> {
    let contents = std::fs::read_to_string(output_dir.join(MANIFEST_FILE))?;
    Ok(serde_json::from_str(&contents)?)
}
