//! In-memory content source.
//!
//! Serves canned bodies and statuses keyed by exact URL, records every
//! request, and tracks how many requests were in flight at once.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::time::Duration;

use crate::error::FetchError;
use crate::source::ContentSource;

#[derive(Debug, Clone)]
enum Canned {
    Body(Vec<u8>),
    Status(u16),
}

/// Canned-response [`ContentSource`]. Unknown URLs answer 404.
#[derive(Debug, Default)]
pub struct MemorySource {
    responses: Mutex<HashMap<String, Canned>>,
    requests: Mutex<Vec<String>>,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every response for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn insert(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.lock_responses().insert(url.into(), Canned::Body(body.into()));
    }

    /// Answer `url` with an HTTP error status.
    pub fn insert_status(&self, url: impl Into<String>, status: u16) {
        self.lock_responses().insert(url.into(), Canned::Status(status));
    }

    pub fn remove(&self, url: &str) {
        self.lock_responses().remove(url);
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of requests whose URL starts with `prefix`.
    pub fn request_count(&self, prefix: &str) -> usize {
        self.requests().iter().filter(|u| u.starts_with(prefix)).count()
    }

    pub fn clear_requests(&self) {
        if let Ok(mut r) = self.requests.lock() {
            r.clear();
        }
    }

    /// Highest number of concurrently outstanding requests seen.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, HashMap<String, Canned>> {
        self.responses.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ContentSource for MemorySource {
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if let Ok(mut r) = self.requests.lock() {
            r.push(url.to_string());
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let canned = self.lock_responses().get(url).cloned();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match canned {
            Some(Canned::Body(body)) => Ok(body),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
