//! Data access and artefact production for the silent-locations builder.
//!
//! Responsibilities:
//! - Build and issue the Overpass query, classifying upstream failures.
//! - Normalise raw elements into [`silent_core::LocationRecord`] rows.
//! - Rebuild the SQLite store and publish the JSON manifest next to it.
//! - Expose [`run_pipeline`] as the single entry point.
//!
//! Boundaries:
//! - Do not encode classification or identity rules (live in `silent-core`).
//! - Keep blocking I/O off async executors; the fetcher owns its runtime.
//!
//! Invariants:
//! - Configuration is passed in explicitly; no global mutable state.
//! - Every run is a full rebuild of the artefacts.

pub mod manifest;
pub mod normalise;
pub mod overpass;
pub mod pipeline;
pub mod store;

pub use manifest::{Manifest, ManifestError, ManifestTarget, RegionDescriptor, write_manifest};
pub use normalise::{KindCounts, NormalisedBatch, normalise_elements};
pub use overpass::{
    ElementSource, FetchConfig, FetchError, FetcherBuildError, OverpassFetcher, OverpassQuery,
    QueryScope, TagFilter,
};
pub use pipeline::{
    DEFAULT_DATABASE_FILE, DEFAULT_MANIFEST_FILE, DEFAULT_OUTPUT_DIR, DEFAULT_REGION_ID,
    PipelineConfig, PipelineError, PipelineReport, run_pipeline, run_pipeline_at,
};
pub use store::{
    DuplicateIdentifier, SchemaParseError, SchemaRevision, StoreBuildError, StoreReport,
    build_store,
};
