use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::template::Placeholders;

/// Id reserved for the pinned entry. It always sorts first.
pub const PINNED_ZONE_ID: i64 = -1;

/// A catalogued game entry.
///
/// `url` and `cover` are templates; see [`Placeholders`] for the tokens they
/// may carry. The only field mutated after load is `featured`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: i64,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub cover: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_link: Option<String>,
    /// Tag list used by the filter control
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub special: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub featured: bool,
}

impl Zone {
    pub fn new(id: i64, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            url: url.into(),
            cover: String::new(),
            author: None,
            author_link: None,
            special: Vec::new(),
            featured: false,
        }
    }

    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = cover.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.special = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>, link: Option<String>) -> Self {
        self.author = Some(author.into());
        self.author_link = link;
        self
    }

    pub fn is_pinned(&self) -> bool {
        self.id == PINNED_ZONE_ID
    }

    /// True when the raw url template is an absolute link to another site.
    /// Such zones open in a new tab instead of the embedded viewer.
    pub fn is_external(&self) -> bool {
        let url = self.url.trim_start();
        url.starts_with("http://") || url.starts_with("https://")
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.special.iter().any(|t| t == tag)
    }

    /// Content URL with placeholder tokens replaced.
    pub fn resolved_url(&self, placeholders: &Placeholders) -> String {
        placeholders.resolve(&self.url)
    }

    /// Cover image URL with placeholder tokens replaced.
    pub fn resolved_cover(&self, placeholders: &Placeholders) -> String {
        placeholders.resolve(&self.cover)
    }
}

/// Decode a catalogue document into zones.
///
/// Entries that don't match the zone shape are dropped rather than failing
/// the whole document. An empty result is reported as
/// [`CoreError::EmptyCatalogue`].
pub fn parse_zones(json: &str) -> Result<(Vec<Zone>, usize), CoreError> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let total = raw.len();
    let zones: Vec<Zone> = raw
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    if zones.is_empty() {
        return Err(CoreError::EmptyCatalogue);
    }
    let dropped = total - zones.len();
    Ok((zones, dropped))
}
