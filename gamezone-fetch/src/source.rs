use std::future::Future;

use serde::de::DeserializeOwned;
use tokio::time::Duration;

use crate::error::FetchError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("gamezone/", env!("CARGO_PKG_VERSION"));

/// Anything that can turn a URL into bytes.
///
/// [`HttpSource`] is the real network; [`crate::memory::MemorySource`]
/// serves canned responses for offline runs and tests. Non-success HTTP
/// statuses are errors.
pub trait ContentSource: Send + Sync {
    fn get_bytes(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;

    /// Body decoded as UTF-8, replacing invalid sequences.
    fn get_text(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send {
        async move {
            let bytes = self.get_bytes(url).await?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// Fetch and decode a JSON document.
pub async fn fetch_json<S, T>(source: &S, url: &str) -> Result<T, FetchError>
where
    S: ContentSource + ?Sized,
    T: DeserializeOwned,
{
    let bytes = source.get_bytes(url).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// reqwest-backed source.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { http })
    }
}

impl ContentSource for HttpSource {
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        log::trace!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}
