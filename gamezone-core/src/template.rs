//! Placeholder substitution for zone URL templates.

/// Token replaced with the HTML content host.
pub const HTML_PLACEHOLDER: &str = "{HTML_URL}";

/// Token replaced with the cover image host.
pub const COVER_PLACEHOLDER: &str = "{COVER_URL}";

/// Base URLs substituted into zone templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    pub html_base: String,
    pub cover_base: String,
}

impl Placeholders {
    /// Trailing slashes are stripped so `{HTML_URL}/1.html` never yields `//`.
    pub fn new(html_base: impl Into<String>, cover_base: impl Into<String>) -> Self {
        Self {
            html_base: html_base.into().trim_end_matches('/').to_string(),
            cover_base: cover_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn resolve(&self, template: &str) -> String {
        template
            .replace(HTML_PLACEHOLDER, &self.html_base)
            .replace(COVER_PLACEHOLDER, &self.cover_base)
    }
}

/// Last path segment of a URL, ignoring any query string or fragment.
///
/// Returns `None` when the path ends in `/` or is empty.
pub fn file_name(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.rsplit('/').next()?;
    if name.is_empty() { None } else { Some(name) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_both_tokens() {
        let p = Placeholders::new("https://html.example/", "https://covers.example");
        assert_eq!(p.resolve("{HTML_URL}/12.html"), "https://html.example/12.html");
        assert_eq!(p.resolve("{COVER_URL}/12.png"), "https://covers.example/12.png");
        assert_eq!(p.resolve("https://elsewhere/x"), "https://elsewhere/x");
    }

    #[test]
    fn file_name_strips_query_and_fragment() {
        assert_eq!(file_name("https://h/a/12.html?v=3#top"), Some("12.html"));
        assert_eq!(file_name("{HTML_URL}/7.html"), Some("7.html"));
        assert_eq!(file_name("https://h/a/"), None);
        assert_eq!(file_name(""), None);
    }
}
