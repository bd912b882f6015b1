//! Sparse checkout of the asset repository and the per-zone asset hashes.
//!
//! The repository holds one directory per zone id. Its tree is hashed once
//! per run, before any worker starts, so workers only ever read the table.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gamezone_lib::MirrorSettings;
use sha2::{Digest, Sha256};
use tokio::process::Command;
use walkdir::WalkDir;

use crate::error::MirrorError;

/// Files in a zone's asset directory that the mirror produces itself.
const EXCLUDED_ASSETS: [&str; 2] = ["index.html", "cover.png"];

/// A shallow, sparse clone of the asset repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRepo {
    pub url: String,
    pub branch: String,
    pub checkout_dir: PathBuf,
    /// Directories to check out; empty checks out the whole tree
    pub sparse_paths: Vec<String>,
}

impl AssetRepo {
    pub fn new(url: impl Into<String>, branch: impl Into<String>, checkout_dir: PathBuf) -> Self {
        Self {
            url: url.into(),
            branch: branch.into(),
            checkout_dir,
            sparse_paths: Vec::new(),
        }
    }

    pub fn from_settings(settings: &MirrorSettings) -> Self {
        Self {
            url: settings.asset_repo.clone(),
            branch: settings.asset_branch.clone(),
            checkout_dir: settings.asset_checkout.clone(),
            sparse_paths: settings.sparse_paths.clone(),
        }
    }

    /// Asset directory for one zone.
    pub fn zone_dir(&self, id: i64) -> PathBuf {
        self.checkout_dir.join(id.to_string())
    }

    /// True when the checkout directory holds anything worth hashing, even
    /// if it could not be brought up to date.
    pub fn has_checkout(&self) -> bool {
        std::fs::read_dir(&self.checkout_dir)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    /// Clone the repository, or bring an existing checkout up to date.
    pub async fn sync(&self) -> Result<(), MirrorError> {
        if self.checkout_dir.join(".git").is_dir() {
            log::debug!("updating asset checkout at {}", self.checkout_dir.display());
            self.git_in(&["fetch", "--depth", "1", "origin", self.branch.as_str()]).await?;
            let target = format!("origin/{}", self.branch);
            return self.git_in(&["reset", "--hard", target.as_str()]).await;
        }

        if let Some(parent) = self.checkout_dir.parent() {
            std::fs::create_dir_all(parent)?;
        }
        log::debug!("cloning {} into {}", self.url, self.checkout_dir.display());
        let dir = self.checkout_dir.to_string_lossy().into_owned();
        run_git(
            None,
            &[
                "clone",
                "--filter=blob:none",
                "--no-checkout",
                "--depth",
                "1",
                "--branch",
                self.branch.as_str(),
                self.url.as_str(),
                dir.as_str(),
            ],
        )
        .await?;

        if !self.sparse_paths.is_empty() {
            let mut args = vec!["sparse-checkout", "set", "--cone"];
            args.extend(self.sparse_paths.iter().map(String::as_str));
            self.git_in(&args).await?;
        }
        self.git_in(&["checkout", self.branch.as_str()]).await
    }

    async fn git_in(&self, args: &[&str]) -> Result<(), MirrorError> {
        run_git(Some(&self.checkout_dir), args).await
    }
}

async fn run_git(cwd: Option<&Path>, args: &[&str]) -> Result<(), MirrorError> {
    let mut cmd = Command::new("git");
    if let Some(dir) = cwd {
        cmd.arg("-C").arg(dir);
    }
    cmd.args(args);
    let command = args.first().copied().unwrap_or_default().to_string();
    let output = cmd.output().await.map_err(|e| MirrorError::Git {
        command: command.clone(),
        message: e.to_string(),
    })?;
    if output.status.success() {
        Ok(())
    } else {
        Err(MirrorError::Git {
            command,
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Hash every numeric zone directory under `root`.
///
/// Directories whose name is not an integer are ignored, as are empty ones.
/// A missing root yields an empty table.
pub fn tree_hashes(root: &Path) -> HashMap<i64, String> {
    let mut table = HashMap::new();
    let Ok(entries) = std::fs::read_dir(root) else {
        return table;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(id) = entry.file_name().to_str().and_then(|n| n.parse::<i64>().ok()) else {
            continue;
        };
        if let Some(hash) = zone_tree_hash(&path) {
            table.insert(id, hash);
        }
    }
    table
}

/// sha256 over the sorted (relative path, contents) pairs of a directory.
///
/// Returns `None` when the directory holds no readable files.
pub fn zone_tree_hash(dir: &Path) -> Option<String> {
    let files = list_files(dir);
    if files.is_empty() {
        return None;
    }
    let mut hasher = Sha256::new();
    for (rel, abs) in &files {
        let Ok(contents) = std::fs::read(abs) else {
            log::debug!("unreadable asset {}", abs.display());
            continue;
        };
        hasher.update(rel.as_bytes());
        hasher.update([0u8]);
        hasher.update(&contents);
        hasher.update([0u8]);
    }
    Some(format!("{:x}", hasher.finalize()))
}

/// Files to copy from a zone's asset directory, as (relative, absolute)
/// paths sorted by relative path.
///
/// The zone's own top-level `index.html` and `cover.png` are left out.
pub fn asset_files(dir: &Path) -> Vec<(String, PathBuf)> {
    list_files(dir)
        .into_iter()
        .filter(|(rel, _)| !EXCLUDED_ASSETS.contains(&rel.as_str()))
        .collect()
}

/// Every regular file below `dir`, keyed by `/`-separated relative path.
fn list_files(dir: &Path) -> Vec<(String, PathBuf)> {
    let mut files: Vec<(String, PathBuf)> = WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| !e.path().components().any(|c| c.as_os_str() == ".git"))
        .filter_map(|e| {
            let rel = e.path().strip_prefix(dir).ok()?;
            let rel = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            Some((rel, e.path().to_path_buf()))
        })
        .collect();
    files.sort_by(|a, b| a.0.cmp(&b.0));
    files
}
