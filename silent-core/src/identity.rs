//! Store-wide identifier reconciliation.
//!
//! OpenStreetMap identifiers are unique only within one [`ElementKind`], so a
//! node and a way may both carry id `500`. Each kind is assigned a fixed
//! offset into a shared `i64` space, one partition of [`PARTITION_WIDTH`]
//! identifiers per kind.

use thiserror::Error;

use crate::ElementKind;

/// Number of source identifiers reserved for each kind.
pub const PARTITION_WIDTH: i64 = 10_000_000_000;

/// Offset applied to node identifiers.
pub const NODE_ID_OFFSET: i64 = 0;

/// Offset applied to way identifiers.
pub const WAY_ID_OFFSET: i64 = PARTITION_WIDTH;

/// Offset applied to relation identifiers.
pub const RELATION_ID_OFFSET: i64 = 2 * PARTITION_WIDTH;

/// Offset table in partition order.
pub const KIND_ID_OFFSETS: [(ElementKind, i64); 3] = [
    (ElementKind::Node, NODE_ID_OFFSET),
    (ElementKind::Way, WAY_ID_OFFSET),
    (ElementKind::Relation, RELATION_ID_OFFSET),
];

/// Errors raised while deriving a store identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Source identifiers are positive; a negative one cannot be placed.
    #[error("{kind} {raw_id} has a negative identifier")]
    Negative {
        /// Kind of the offending element.
        kind: ElementKind,
        /// Identifier as supplied by the source.
        raw_id: i64,
    },
    /// The offset identifier does not fit in `i64`.
    #[error("{kind} {raw_id} overflows the identifier space")]
    Overflow {
        /// Kind of the offending element.
        kind: ElementKind,
        /// Identifier as supplied by the source.
        raw_id: i64,
    },
}

impl ElementKind {
    /// Offset added to this kind's source identifiers.
    ///
    /// # Examples
    /// ```
    /// use silent_core::{ElementKind, WAY_ID_OFFSET};
    ///
    /// assert_eq!(ElementKind::Way.id_offset(), WAY_ID_OFFSET);
    /// ```
    #[must_use]
    pub const fn id_offset(self) -> i64 {
        match self {
            Self::Node => NODE_ID_OFFSET,
            Self::Way => WAY_ID_OFFSET,
            Self::Relation => RELATION_ID_OFFSET,
        }
    }
}

/// Derive the store-wide identifier for a source element.
///
/// # Errors
/// Returns [`IdentityError::Negative`] for negative source identifiers and
/// [`IdentityError::Overflow`] when the offset result leaves `i64`.
///
/// # Examples
/// ```
/// use silent_core::{ElementKind, derive_location_id};
///
/// assert_eq!(derive_location_id(ElementKind::Node, 500), Ok(500));
/// assert_eq!(derive_location_id(ElementKind::Way, 500), Ok(10_000_000_500));
/// assert_eq!(derive_location_id(ElementKind::Relation, 500), Ok(20_000_000_500));
/// ```
pub const fn derive_location_id(kind: ElementKind, raw_id: i64) -> Result<i64, IdentityError> {
    if raw_id < 0 {
        return Err(IdentityError::Negative { kind, raw_id });
    }
    match raw_id.checked_add(kind.id_offset()) {
        Some(id) => Ok(id),
        None => Err(IdentityError::Overflow { kind, raw_id }),
    }
}

/// Report whether `raw_id` spills into the next kind's partition.
///
/// Such identifiers still derive a value but may collide with another kind;
/// the store's primary key catches any collision that does occur.
#[must_use]
pub const fn exceeds_partition(raw_id: i64) -> bool {
    raw_id >= PARTITION_WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ElementKind::Node, 500, 500)]
    #[case(ElementKind::Way, 500, 10_000_000_500)]
    #[case(ElementKind::Relation, 500, 20_000_000_500)]
    #[case(ElementKind::Node, 0, 0)]
    fn applies_kind_offsets(#[case] kind: ElementKind, #[case] raw: i64, #[case] expected: i64) {
        assert_eq!(derive_location_id(kind, raw), Ok(expected));
    }

    #[rstest]
    fn offset_table_matches_kind_offsets() {
        for (kind, offset) in KIND_ID_OFFSETS {
            assert_eq!(kind.id_offset(), offset);
        }
    }

    #[rstest]
    fn rejects_negative_identifiers() {
        assert_eq!(
            derive_location_id(ElementKind::Way, -1),
            Err(IdentityError::Negative {
                kind: ElementKind::Way,
                raw_id: -1
            })
        );
    }

    #[rstest]
    fn reports_overflow() {
        assert_eq!(
            derive_location_id(ElementKind::Relation, i64::MAX),
            Err(IdentityError::Overflow {
                kind: ElementKind::Relation,
                raw_id: i64::MAX
            })
        );
    }

    #[rstest]
    #[case(PARTITION_WIDTH - 1, false)]
    #[case(PARTITION_WIDTH, true)]
    fn flags_identifiers_at_partition_width(#[case] raw: i64, #[case] expected: bool) {
        assert_eq!(exceeds_partition(raw), expected);
    }
}
