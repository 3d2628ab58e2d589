//! Sogou pinyin dictionary harvester.
//!
//! Downloads `.scel` dictionaries from the Sogou catalog, either by id or by walking every
//! page of a category, and hands the collected files to an external converter.

mod config;
mod convert;
mod error;
mod macros;
mod parse;
pub mod process;
mod request;

pub use config::{Config, DEFAULT_ORIGIN};
pub use convert::{handoff_file_name, CommandConverter, Converter};
pub use error::{Error, Result};
pub use parse::{
    parse_listing, sanitize_file_name, select_entries, CatalogEntry, Listing, ListingPage,
    INVALID_SYMBOLS,
};
pub use request::{
    build_client, category_page_url, direct_download_url, ArtifactFetcher, HttpFetcher,
};

/// Substring the catalog puts into the name of officially recommended dictionaries.
pub const RECOMMEND_MARKER: &str = "官方推荐";
const SCEL_EXT: &str = "scel";
