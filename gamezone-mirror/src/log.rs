use std::path::{Path, PathBuf};

use crate::entry::{EntryOutcome, EntryStatus};

/// Collects per-entry outcomes and writes the run log file.
#[derive(Debug, Default)]
pub struct MirrorLog {
    entries: Vec<EntryOutcome>,
    notes: Vec<String>,
}

impl MirrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, outcome: EntryOutcome) {
        self.entries.push(outcome);
    }

    /// Run-level remark, e.g. an asset sync that fell back to no assets.
    pub fn note(&mut self, message: impl Into<String>) {
        self.notes.push(message.into());
    }

    pub fn entries(&self) -> &[EntryOutcome] {
        &self.entries
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn summary(&self) -> LogSummary {
        let mut summary = LogSummary::default();
        for entry in &self.entries {
            match entry.status {
                EntryStatus::New => summary.new += 1,
                EntryStatus::Updated => summary.updated += 1,
                EntryStatus::Skipped => summary.skipped += 1,
                EntryStatus::Failed => summary.failed += 1,
            }
            summary.warnings += entry.warnings.len();
        }
        summary
    }

    /// `mirror-log-YYYYMMDD-HHMMSS.txt` in `dir`, stamped with local time.
    pub fn default_path(dir: &Path) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        dir.join(format!("mirror-log-{}.txt", stamp))
    }

    /// Write the log to a file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        let summary = self.summary();

        writeln!(file, "=== Mirror Log ===")?;
        writeln!(
            file,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(file, "New: {}", summary.new)?;
        writeln!(file, "Updated: {}", summary.updated)?;
        writeln!(file, "Skipped: {}", summary.skipped)?;
        writeln!(file, "Failed: {}", summary.failed)?;
        writeln!(file, "Warnings: {}", summary.warnings)?;
        for note in &self.notes {
            writeln!(file, "Note: {}", note)?;
        }
        writeln!(file)?;
        writeln!(file, "--- Details ---")?;
        writeln!(file)?;

        let mut entries: Vec<&EntryOutcome> = self.entries.iter().collect();
        entries.sort_by_key(|e| e.id);
        for entry in entries {
            let tag = entry.status.as_str().to_uppercase();
            writeln!(
                file,
                "[{}] {} \"{}\" -> {}",
                tag, entry.id, entry.name, entry.folder
            )?;
            if let Some(error) = &entry.error {
                writeln!(file, "     Error: {}", error)?;
            }
            for w in &entry.warnings {
                writeln!(file, "     Warning: {}", w)?;
            }
        }

        file.flush()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LogSummary {
    pub new: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub warnings: usize,
}

impl LogSummary {
    pub fn total(&self) -> usize {
        self.new + self.updated + self.skipped + self.failed
    }
}
