//! Gallery ordering.

use std::cmp::Reverse;

use crate::error::SortModeParseError;
use crate::popularity::{Period, PopularityData};
use crate::zone::Zone;

/// Sort selection offered by the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    #[default]
    Name,
    Id,
    /// Most hits over the yearly window
    Popular,
    TrendingMonth,
    TrendingWeek,
    TrendingDay,
}

const ALL_SORT_MODES: &[SortMode] = &[
    SortMode::Name,
    SortMode::Id,
    SortMode::Popular,
    SortMode::TrendingMonth,
    SortMode::TrendingWeek,
    SortMode::TrendingDay,
];

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Id => "id",
            Self::Popular => "popular",
            Self::TrendingMonth => "trendingMonth",
            Self::TrendingWeek => "trendingWeek",
            Self::TrendingDay => "trendingDay",
        }
    }

    /// Statistics window backing this mode, if it is popularity-based.
    pub fn period(&self) -> Option<Period> {
        match self {
            Self::Name | Self::Id => None,
            Self::Popular => Some(Period::Year),
            Self::TrendingMonth => Some(Period::Month),
            Self::TrendingWeek => Some(Period::Week),
            Self::TrendingDay => Some(Period::Day),
        }
    }

    pub fn all() -> &'static [SortMode] {
        ALL_SORT_MODES
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortMode {
    type Err = SortModeParseError;

    /// Case-insensitive; `trending-week` and `trending_week` are accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        ALL_SORT_MODES
            .iter()
            .copied()
            .find(|m| m.as_str().to_lowercase() == normalized)
            .ok_or_else(|| SortModeParseError(s.to_string()))
    }
}

/// Reorder `zones` in place for the given mode.
///
/// All sorts are stable, so repeating a sort with the same key leaves the
/// order unchanged. The pinned entry is moved back to the front afterwards.
pub fn sort_zones(zones: &mut [Zone], mode: SortMode, popularity: &PopularityData) {
    match mode.period() {
        None if mode == SortMode::Id => zones.sort_by_key(|z| z.id),
        None => zones.sort_by_cached_key(|z| z.name.to_lowercase()),
        Some(period) => zones.sort_by_key(|z| Reverse(popularity.hits(period, z.id))),
    }
    pin_to_front(zones);
}

fn pin_to_front(zones: &mut [Zone]) {
    if let Some(pos) = zones.iter().position(Zone::is_pinned) {
        zones[..=pos].rotate_right(1);
    }
}

#[cfg(test)]
#[path = "tests/sort_tests.rs"]
mod tests;
