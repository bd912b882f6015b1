use gamezone_fetch::FetchError;

/// Errors that can occur while mirroring the catalogue.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("Download failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("git {command} failed: {message}")]
    Git { command: String, message: String },

    #[error("Cannot create output directory {}: {source}", .path.display())]
    OutputDir {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
