use std::collections::HashMap;

use crate::error::PeriodParseError;

/// Statistics window used by the popularity endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

const ALL_PERIODS: &[Period] = &[Period::Day, Period::Week, Period::Month, Period::Year];

impl Period {
    /// Value sent as the `period` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    pub fn all() -> &'static [Period] {
        ALL_PERIODS
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_PERIODS
            .iter()
            .copied()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| PeriodParseError(s.to_string()))
    }
}

/// Hit counts per zone id for each statistics window.
///
/// Rebuilt on every catalogue load and never persisted. Lookups for a
/// missing window or id read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopularityData {
    windows: HashMap<Period, HashMap<i64, u64>>,
}

impl PopularityData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the counts for one window.
    pub fn insert_window(&mut self, period: Period, counts: HashMap<i64, u64>) {
        self.windows.insert(period, counts);
    }

    pub fn with_window(mut self, period: Period, counts: HashMap<i64, u64>) -> Self {
        self.insert_window(period, counts);
        self
    }

    pub fn hits(&self, period: Period, id: i64) -> u64 {
        self.windows
            .get(&period)
            .and_then(|w| w.get(&id))
            .copied()
            .unwrap_or(0)
    }

    pub fn window(&self, period: Period) -> Option<&HashMap<i64, u64>> {
        self.windows.get(&period)
    }

    /// True when no window holds any counts.
    pub fn is_empty(&self) -> bool {
        self.windows.values().all(HashMap::is_empty)
    }
}

/// Extract the numeric zone id from a stats path such as `/123.html`.
pub fn parse_id_from_path(name: &str) -> Option<i64> {
    let file = name.rsplit('/').next()?;
    let stem = file.split('.').next()?;
    stem.parse().ok()
}
