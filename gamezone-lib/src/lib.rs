//! Runtime plumbing shared by the catalogue client, the mirror downloader
//! and the CLI: configuration, retry policy, the bounded worker pool and the
//! event-draining helper.

pub mod async_util;
pub mod error;
pub mod retry;
pub mod settings;
pub mod util;
pub mod worker_pool;

pub use error::SettingsError;
pub use retry::{Backoff, RetryPolicy};
pub use settings::{Endpoints, MirrorSettings, RetrySettings, Settings, settings_path};
pub use worker_pool::WorkerPool;

// Re-export the data model so downstream crates need a single dependency
// for the common types.
pub use gamezone_core::{Catalogue, Filter, Period, Placeholders, SortMode, Zone};
