//! Cursor token payload: the row-boundary key values.

use serde::{Deserialize, Serialize};

use crate::types::{KeyValue, SortDir};

/// One component of a page boundary: the field it was taken from, its
/// value in the boundary row, and the direction it was sorted in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorBound {
    /// Business field name the value belongs to.
    pub field: String,
    /// The value at the page boundary.
    pub value: KeyValue,
    /// Direction this field was sorted in when the page was produced.
    pub dir: SortDir,
}

impl CursorBound {
    /// Create a boundary component.
    pub fn new(field: impl Into<String>, value: impl Into<KeyValue>, dir: SortDir) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            dir,
        }
    }
}

/// The payload sealed inside a cursor token: the `(primary, tie_breaker)`
/// key values of the last row returned before the boundary.
///
/// Serialization is deterministic - struct fields serialize in declaration
/// order and scalar formatting is stable - so signing and verification are
/// reproducible across processes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CursorClaims {
    /// Boundary value of the primary sort field.
    pub primary: CursorBound,
    /// Boundary value of the tie-breaking field.
    pub tie_breaker: CursorBound,
}

impl CursorClaims {
    /// Create a claims pair.
    #[must_use]
    pub const fn new(primary: CursorBound, tie_breaker: CursorBound) -> Self {
        Self {
            primary,
            tie_breaker,
        }
    }
}
