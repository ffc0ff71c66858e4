//! SQLite artefact consumed by the mobile app.
//!
//! Every build deletes the previous artefact and writes a fresh `locations`
//! table inside one transaction.
#![forbid(unsafe_code)]

mod builder;
mod schema;

pub use builder::{DuplicateIdentifier, StoreBuildError, StoreReport, build_store, journal_path};
pub use schema::{SchemaParseError, SchemaRevision};
