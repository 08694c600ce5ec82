//! Subcommand implementations for the `udyam-form` binary.

pub mod check;
pub mod scrape;
pub mod survey;
pub mod validate;
