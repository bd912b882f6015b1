use thiserror::Error;

/// Errors raised while decoding catalogue data.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The payload was not valid JSON or did not match the expected shape
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The catalogue decoded but held no usable zones
    #[error("Catalogue is empty")]
    EmptyCatalogue,
}

/// Error returned when a string cannot be parsed into a `SortMode`.
#[derive(Debug, Clone, Error)]
#[error("unknown sort mode: '{0}' (expected name, id, popular, trendingMonth, trendingWeek or trendingDay)")]
pub struct SortModeParseError(pub String);

/// Error returned when a string cannot be parsed into a `Period`.
#[derive(Debug, Clone, Error)]
#[error("unknown period: '{0}' (expected day, week, month or year)")]
pub struct PeriodParseError(pub String);
