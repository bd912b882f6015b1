//! Data model and in-memory gallery pipeline for the zone catalogue.
//!
//! Nothing in this crate performs I/O. The network side lives in
//! `gamezone-fetch`, the mirror downloader in `gamezone-mirror`.

pub mod catalogue;
pub mod error;
pub mod filter;
pub mod gallery;
pub mod popularity;
pub mod sort;
pub mod template;
pub mod util;
pub mod zone;

pub use catalogue::{Catalogue, collect_tags};
pub use error::{CoreError, PeriodParseError, SortModeParseError};
pub use filter::Filter;
pub use gallery::{Card, Gallery, PageRequest, build_gallery};
pub use popularity::{Period, PopularityData, parse_id_from_path};
pub use sort::{SortMode, sort_zones};
pub use template::{Placeholders, file_name};
pub use zone::{PINNED_ZONE_ID, Zone, parse_zones};
pub use util::sanitize_folder_name;
