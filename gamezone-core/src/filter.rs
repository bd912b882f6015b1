use crate::zone::Zone;

/// Tag value the filter control uses for "no tag selected".
const NO_TAG: &str = "none";

/// Gallery filter: a free-text name search or an exact tag match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    None,
    /// Lowercased query matched as a substring of the zone name
    Search(String),
    Tag(String),
}

impl Filter {
    /// Free-text search. Blank queries disable filtering.
    pub fn search(query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            Self::None
        } else {
            Self::Search(query.to_lowercase())
        }
    }

    /// Exact tag match. An empty tag or `none` disables filtering.
    pub fn tag(tag: &str) -> Self {
        let tag = tag.trim();
        if tag.is_empty() || tag.eq_ignore_ascii_case(NO_TAG) {
            Self::None
        } else {
            Self::Tag(tag.to_string())
        }
    }

    pub fn matches(&self, zone: &Zone) -> bool {
        match self {
            Self::None => true,
            Self::Search(query) => zone.name.to_lowercase().contains(query.as_str()),
            Self::Tag(tag) => zone.has_tag(tag),
        }
    }

    /// Zones passing the filter, in their current order.
    pub fn apply<'a>(&self, zones: &'a [Zone]) -> Vec<&'a Zone> {
        zones.iter().filter(|z| self.matches(z)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zones() -> Vec<Zone> {
        vec![
            Zone::new(1, "Math Blaster", "{HTML_URL}/1.html").with_tags(["edu"]),
            Zone::new(2, "Aftermath", "{HTML_URL}/2.html").with_tags(["action", "edu"]),
            Zone::new(3, "Snake", "{HTML_URL}/3.html"),
        ]
    }

    #[test]
    fn search_is_case_insensitive_and_partial() {
        let zones = zones();
        let hits: Vec<i64> = Filter::search("math").apply(&zones).iter().map(|z| z.id).collect();
        assert_eq!(hits, vec![1, 2]);
        let hits: Vec<i64> = Filter::search("SNA").apply(&zones).iter().map(|z| z.id).collect();
        assert_eq!(hits, vec![3]);
    }

    #[test]
    fn unknown_tag_yields_nothing() {
        assert!(Filter::tag("horror").apply(&zones()).is_empty());
    }

    #[test]
    fn tag_match_is_exact() {
        let zones = zones();
        assert_eq!(Filter::tag("edu").apply(&zones).len(), 2);
        assert!(Filter::tag("ed").apply(&zones).is_empty());
    }

    #[test]
    fn empty_or_none_restores_full_list() {
        let zones = zones();
        assert_eq!(Filter::tag("").apply(&zones).len(), 3);
        assert_eq!(Filter::tag("none").apply(&zones).len(), 3);
        assert_eq!(Filter::search("   ").apply(&zones).len(), 3);
        assert_eq!(Filter::tag("none"), Filter::None);
    }
}
