//! Application state for one catalogue snapshot.

use std::collections::{BTreeSet, HashSet};

use crate::filter::Filter;
use crate::popularity::PopularityData;
use crate::sort::{SortMode, sort_zones};
use crate::zone::Zone;

/// Zone list, popularity counts and tag list for one load.
///
/// A catalogue is built once by the loader and replaced wholesale on
/// re-fetch. The only in-place change is reordering via [`Catalogue::sort`].
#[derive(Debug, Clone)]
pub struct Catalogue {
    zones: Vec<Zone>,
    popularity: PopularityData,
    tags: Vec<String>,
    revision: Option<String>,
    source_url: String,
    sort_mode: SortMode,
}

impl Catalogue {
    /// Build the state from freshly fetched data.
    ///
    /// Later duplicates of an id are dropped. The first remaining zone is
    /// flagged as featured.
    pub fn new(
        zones: Vec<Zone>,
        popularity: PopularityData,
        revision: Option<String>,
        source_url: impl Into<String>,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut zones: Vec<Zone> = zones.into_iter().filter(|z| seen.insert(z.id)).collect();
        if let Some(first) = zones.first_mut() {
            first.featured = true;
        }
        let tags = collect_tags(&zones);
        Self {
            zones,
            popularity,
            tags,
            revision,
            source_url: source_url.into(),
            sort_mode: SortMode::default(),
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn popularity(&self) -> &PopularityData {
        &self.popularity
    }

    /// Sorted union of every zone's tags.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Source-repository revision the catalogue was loaded from, if known.
    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn zone(&self, id: i64) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Reorder the underlying zone list.
    pub fn sort(&mut self, mode: SortMode) {
        sort_zones(&mut self.zones, mode, &self.popularity);
        self.sort_mode = mode;
    }

    /// Zones passing `filter`, in the current sort order.
    pub fn view(&self, filter: &Filter) -> Vec<&Zone> {
        filter.apply(&self.zones)
    }
}

/// Union of all zones' tag arrays, sorted and deduplicated.
pub fn collect_tags(zones: &[Zone]) -> Vec<String> {
    zones
        .iter()
        .flat_map(|z| z.special.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> Catalogue {
        let zones = vec![
            Zone::new(4, "Delta", "{HTML_URL}/4.html").with_tags(["retro", "action"]),
            Zone::new(-1, "Pinned", "{HTML_URL}/-1.html"),
            Zone::new(2, "Bravo", "{HTML_URL}/2.html").with_tags(["action"]),
            Zone::new(2, "Bravo duplicate", "{HTML_URL}/2.html"),
        ];
        Catalogue::new(zones, PopularityData::new(), Some("abc123".into()), "https://cdn/zones.json")
    }

    #[test]
    fn first_zone_is_featured() {
        let cat = catalogue();
        assert!(cat.zones()[0].featured);
        assert!(cat.zones()[1..].iter().all(|z| !z.featured));
    }

    #[test]
    fn duplicate_ids_are_dropped() {
        let cat = catalogue();
        assert_eq!(cat.len(), 3);
        assert_eq!(cat.zone(2).map(|z| z.name.as_str()), Some("Bravo"));
    }

    #[test]
    fn tags_are_sorted_union() {
        assert_eq!(catalogue().tags(), ["action", "retro"]);
    }

    #[test]
    fn sort_then_view_keeps_order() {
        let mut cat = catalogue();
        cat.sort(SortMode::Id);
        assert_eq!(cat.sort_mode(), SortMode::Id);
        let view: Vec<i64> = cat.view(&Filter::tag("action")).iter().map(|z| z.id).collect();
        assert_eq!(view, vec![2, 4]);
        assert_eq!(cat.zones()[0].id, -1);
    }
}
