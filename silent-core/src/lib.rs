//! Domain rules for the silent-locations dataset builder.
//!
//! Responsibilities:
//! - Model the raw map elements returned by the geodata service.
//! - Reconcile source identifiers into a single store-wide identifier space.
//! - Classify tag sets into the closed application category set.
//! - Synthesise display names and addresses, and apply the name denylist.
//!
//! Boundaries:
//! - No I/O; fetching and persistence live in `silent-data`.
//!
//! Invariants:
//! - Every function is deterministic for a given input.
//! - No global mutable state.
#![forbid(unsafe_code)]

pub mod address;
pub mod category;
pub mod classifier;
pub mod element;
pub mod exclusion;
pub mod identity;
pub mod record;

pub use address::{CITY_TAG, HOUSE_NUMBER_TAG, STREET_TAG, UNKNOWN_ADDRESS, synthesise_address};
pub use category::{Category, CategoryParseError};
pub use classifier::{ClassificationRule, Classifier, TagMatch};
pub use element::{Center, ElementKind, RawElement, Tags, validated_coord};
pub use exclusion::{DEFAULT_DENYLIST, NameFilter};
pub use identity::{
    IdentityError, KIND_ID_OFFSETS, NODE_ID_OFFSET, PARTITION_WIDTH, RELATION_ID_OFFSET,
    WAY_ID_OFFSET, derive_location_id, exceeds_partition,
};
pub use record::{LocationRecord, NAME_TAG, UNNAMED, display_name};
