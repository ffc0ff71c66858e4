//! Facade crate for the silent-mode location dataset builder.
//!
//! This crate re-exports the domain rules and, behind the `pipeline`
//! feature, the fetch/store/manifest pipeline.
//!
//! ```
//! use silent_locations::{Category, Classifier, Tags};
//!
//! let tags = Tags::from([("amenity".to_owned(), "library".to_owned())]);
//! assert_eq!(Classifier::standard().classify(&tags), Category::Library);
//! ```

#![forbid(unsafe_code)]

pub use silent_core::{
    Category, ClassificationRule, Classifier, ElementKind, IdentityError, LocationRecord,
    NameFilter, RawElement, Tags, derive_location_id, synthesise_address,
};

#[cfg(feature = "pipeline")]
pub use silent_data::{
    ElementSource, FetchConfig, FetchError, OverpassFetcher, OverpassQuery, PipelineConfig,
    PipelineError, PipelineReport, QueryScope, SchemaRevision, run_pipeline, run_pipeline_at,
};
