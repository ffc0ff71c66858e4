//! Conversion of raw elements into store-ready records.

use log::{debug, info, warn};
use silent_core::{
    Classifier, ElementKind, LocationRecord, NameFilter, PARTITION_WIDTH, RawElement,
    derive_location_id, display_name, exceeds_partition, synthesise_address,
};

/// Number of received elements per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KindCounts {
    /// Nodes received.
    pub nodes: u64,
    /// Ways received.
    pub ways: u64,
    /// Relations received.
    pub relations: u64,
}

impl KindCounts {
    fn record(&mut self, kind: ElementKind) {
        match kind {
            ElementKind::Node => self.nodes += 1,
            ElementKind::Way => self.ways += 1,
            ElementKind::Relation => self.relations += 1,
        }
    }

    /// Total elements received.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.nodes + self.ways + self.relations
    }
}

/// Outcome of normalising one response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalisedBatch {
    /// Accepted records in source order.
    pub records: Vec<LocationRecord>,
    /// Elements dropped by the name denylist.
    pub excluded_by_name: u64,
    /// Elements dropped because they could not be placed on a map.
    pub dropped_without_position: u64,
    /// Elements dropped because no store identifier could be derived.
    pub rejected_identifiers: u64,
    /// Received elements per kind.
    pub counts_by_kind: KindCounts,
}

/// Normalise raw elements into [`LocationRecord`] rows.
///
/// Elements without a resolvable position are dropped silently, names
/// matched by `name_filter` are excluded, and every survivor receives a
/// store-wide identifier, a category and a display address.
#[must_use]
pub fn normalise_elements(
    elements: &[RawElement],
    classifier: &Classifier,
    name_filter: &NameFilter,
) -> NormalisedBatch {
    let mut batch = NormalisedBatch::default();
    for element in elements {
        batch.counts_by_kind.record(element.kind);

        let Some(position) = element.position() else {
            debug!(
                "Dropped {} {}: no usable coordinates",
                element.kind, element.id
            );
            batch.dropped_without_position += 1;
            continue;
        };

        let id = match derive_location_id(element.kind, element.id) {
            Ok(id) => id,
            Err(err) => {
                warn!("Skipped OSM element: {err}");
                batch.rejected_identifiers += 1;
                continue;
            }
        };
        if exceeds_partition(element.id) {
            warn!(
                "OSM element {} {} reaches the partition width {PARTITION_WIDTH}; it may collide with another kind",
                element.kind, element.id
            );
        }

        let name = display_name(&element.tags);
        if let Some(term) = name_filter.matching_term(&name) {
            debug!(
                "Excluded {} {} ({name}): name contains {term:?}",
                element.kind, element.id
            );
            batch.excluded_by_name += 1;
            continue;
        }

        batch.records.push(LocationRecord {
            id,
            name,
            lat: position.y,
            lon: position.x,
            category: classifier.classify(&element.tags),
            address: synthesise_address(&element.tags),
        });
    }

    info!(
        "Normalised {} elements: {} accepted, {} excluded by name, {} without position",
        batch.counts_by_kind.total(),
        batch.records.len(),
        batch.excluded_by_name,
        batch.dropped_without_position
    );
    batch
}
