use gamezone_core::CoreError;

/// Errors that can occur while talking to the catalogue, stats or content hosts.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalogue data error: {0}")]
    Core(#[from] CoreError),

    /// Every catalogue candidate URL failed
    #[error("Could not load the game catalogue (tried {})", .tried.join(", "))]
    Catalogue { tried: Vec<String> },

    /// The zone links to another site and has no fetchable document
    #[error("Zone opens an external site: {0}")]
    External(String),

    #[error("No zone with id {0}")]
    UnknownZone(i64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
