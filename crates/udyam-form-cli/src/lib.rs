//! Command-line front end for the Udyam form schema extractor.

pub mod commands;
pub mod config;
pub mod output;

pub use commands::scrape::{scrape, ScrapeOptions, ScrapeReport};
pub use config::resolve_schema_path;
