pub mod error;
pub mod loader;
pub mod memory;
pub mod revision;
pub mod source;
pub mod stats;
pub mod types;
pub mod viewer;

pub use error::FetchError;
pub use loader::CatalogueLoader;
pub use memory::MemorySource;
pub use revision::{catalogue_candidates, discover_revision};
pub use source::{ContentSource, HttpSource, fetch_json};
pub use stats::{AllTimeStats, PAGE_LIMIT, StatsClient};
pub use types::{CommitInfo, Counter, FileStat, ZoneStats};
pub use viewer::{
    Viewer, ZONE_QUERY_PARAM, ZoneDetails, ZoneTarget, pop_out, pop_out_in, save_html,
    share_link,
    zone_id_from_link,
};
