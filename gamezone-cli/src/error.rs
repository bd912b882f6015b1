use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Settings file missing, unreadable or invalid
    #[error("Config error: {0}")]
    Config(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Catalogue, stats or zone download failed
    #[error("{0}")]
    Fetch(#[from] gamezone_fetch::FetchError),

    /// Mirror run could not start
    #[error("Mirror error: {0}")]
    Mirror(#[from] gamezone_mirror::MirrorError),

    /// No zone with the requested id
    #[error("Zone not found: {0}")]
    NotFound(String),
}

impl CliError {
    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    pub(crate) fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl From<gamezone_lib::SettingsError> for CliError {
    fn from(e: gamezone_lib::SettingsError) -> Self {
        Self::Config(e.to_string())
    }
}
