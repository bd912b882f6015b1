//! Catalogue revision discovery and the candidate URL chain.

use gamezone_lib::Endpoints;

use crate::source::{ContentSource, fetch_json};
use crate::types::CommitInfo;

/// Look up the latest source-repository revision.
///
/// Tries the commits API first, then the raw `sha.txt` file. Any failure is
/// swallowed; `None` means the caller should fall back to the aliases.
pub async fn discover_revision<S: ContentSource + ?Sized>(
    source: &S,
    endpoints: &Endpoints,
) -> Option<String> {
    let api = format!("{}/commits", endpoints.revision_api.trim_end_matches('/'));
    match fetch_json::<_, Vec<CommitInfo>>(source, &api).await {
        Ok(commits) => {
            if let Some(sha) = commits.into_iter().next().map(|c| c.sha).filter(|s| is_revision(s)) {
                return Some(sha);
            }
            log::debug!("revision API returned no commits");
        }
        Err(e) => log::debug!("revision API lookup failed: {}", e),
    }

    let raw = format!("{}/sha.txt", endpoints.revision_raw.trim_end_matches('/'));
    match source.get_text(&raw).await {
        Ok(text) => {
            let sha = text.trim();
            if is_revision(sha) {
                return Some(sha.to_string());
            }
            log::debug!("sha.txt did not hold a revision");
        }
        Err(e) => log::debug!("sha.txt lookup failed: {}", e),
    }
    None
}

/// Hex digits only, so the value is safe to splice into a URL.
fn is_revision(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Catalogue URLs in the order they should be tried.
pub fn catalogue_candidates(endpoints: &Endpoints, revision: Option<&str>) -> Vec<String> {
    let cdn = endpoints.catalogue_cdn.trim_end_matches('/');
    revision
        .into_iter()
        .chain(endpoints.catalogue_aliases.iter().map(String::as_str))
        .map(|rev| format!("{cdn}@{rev}/zones.json"))
        .collect()
}
