//! Keyset predicate construction and SQL rendering.

use crate::dialect::Dialect;
use crate::token::CursorClaims;
use crate::types::{KeyValue, SortDir};

/// Strict comparison applied to one key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCmp {
    /// Strictly greater than: `>`
    Gt,
    /// Strictly less than: `<`
    Lt,
}

impl KeyCmp {
    /// SQL operator for this comparison.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }

    /// Operator selecting rows past a boundary, given the column's sort
    /// direction and the scan direction (`forward` = after-cursor).
    #[must_use]
    pub const fn for_scan(dir: SortDir, forward: bool) -> Self {
        match (forward, dir) {
            (true, SortDir::Asc) | (false, SortDir::Desc) => Self::Gt,
            (true, SortDir::Desc) | (false, SortDir::Asc) => Self::Lt,
        }
    }
}

/// One column bound of a keyset predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBound {
    /// Resolved, storage-qualified column.
    pub column: String,
    /// Boundary value decoded from the cursor token.
    pub value: KeyValue,
    /// Comparison selecting rows past the boundary.
    pub cmp: KeyCmp,
}

/// The keyset boundary predicate: include rows whose
/// `(primary, tie_breaker)` tuple lies strictly past the decoded boundary.
///
/// Because normalization pins the cursor key pair to the first two ORDER
/// BY positions, two bounds are always sufficient, however many cosmetic
/// sort terms follow them.
#[derive(Debug, Clone, PartialEq)]
pub struct KeysetPredicate {
    /// Bound on the primary sort column.
    pub primary: ColumnBound,
    /// Bound on the tie-breaking column.
    pub tie_breaker: ColumnBound,
}

impl KeysetPredicate {
    /// Build the predicate from verified token claims and the resolved
    /// key columns. Each column gets its comparison from its own decoded
    /// direction, so mixed-direction orderings stay correct.
    #[must_use]
    pub fn from_claims(
        claims: &CursorClaims,
        primary_column: &str,
        tie_breaker_column: &str,
        forward: bool,
    ) -> Self {
        Self {
            primary: ColumnBound {
                column: primary_column.to_string(),
                value: claims.primary.value.clone(),
                cmp: KeyCmp::for_scan(claims.primary.dir, forward),
            },
            tie_breaker: ColumnBound {
                column: tie_breaker_column.to_string(),
                value: claims.tie_breaker.value.clone(),
                cmp: KeyCmp::for_scan(claims.tie_breaker.dir, forward),
            },
        }
    }

    /// Render as a parameterized SQL fragment, with placeholders starting
    /// at `start_idx`. Returns the fragment, its parameters in binding
    /// order, and the next free placeholder index.
    ///
    /// When both columns compare the same way the efficient row-value form
    /// is used: `(p, t) > ($1, $2)`. Mixed directions expand to
    /// `(p < $1 OR (p = $2 AND t > $3))`, the standard keyset expansion.
    #[must_use]
    pub fn to_sql<D: Dialect>(&self, dialect: D, start_idx: usize) -> (String, Vec<KeyValue>, usize) {
        let p = &self.primary;
        let t = &self.tie_breaker;

        if p.cmp == t.cmp {
            let sql = format!(
                "({}, {}) {} ({}, {})",
                p.column,
                t.column,
                p.cmp.as_sql(),
                dialect.param(start_idx),
                dialect.param(start_idx + 1),
            );
            (sql, vec![p.value.clone(), t.value.clone()], start_idx + 2)
        } else {
            let sql = format!(
                "({} {} {} OR ({} = {} AND {} {} {}))",
                p.column,
                p.cmp.as_sql(),
                dialect.param(start_idx),
                p.column,
                dialect.param(start_idx + 1),
                t.column,
                t.cmp.as_sql(),
                dialect.param(start_idx + 2),
            );
            (
                sql,
                vec![p.value.clone(), p.value.clone(), t.value.clone()],
                start_idx + 3,
            )
        }
    }
}
