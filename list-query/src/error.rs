//! Error taxonomy for list queries.
//!
//! Three classes, per the propagation policy of the engine:
//!
//! - [`ConfigError`] - caller/integration bugs. Fail loudly in CI, never
//!   retryable.
//! - Client/request faults ([`TokenError`], illegal sort fields) - surfaced
//!   as rejected requests; the client's remedy is to restart pagination.
//! - Executor faults - wrapped storage errors, never reclassified.
//!
//! None of these are transient; nothing here is retried internally.

use thiserror::Error;

/// Token verification failures.
///
/// Always a client-input fault: the token travels through
/// attacker-controlled transport. A malformed or tampered cursor never
/// silently falls back to "first page" - it is always rejected, since a
/// silent reset would make the client believe it advanced past rows it
/// never received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TokenError {
    /// Wrong segment count or undecodable base64.
    #[error("cursor token is malformed")]
    Malformed,
    /// Token exceeds the size cap, rejected before any decoding.
    #[error("cursor token exceeds maximum size ({max} bytes)")]
    TooLarge {
        /// The enforced cap in bytes.
        max: usize,
    },
    /// Recomputed MAC does not match the supplied signature.
    #[error("cursor token signature mismatch")]
    SignatureMismatch,
    /// Signature checked out but the payload is not a valid key set.
    #[error("cursor token payload is not a valid cursor key set")]
    InvalidPayload,
}

/// Caller configuration mistakes.
///
/// These indicate integration bugs (a listing call-site wired up wrong),
/// not request-time faults, and should be caught by integration tests
/// rather than in production.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Cursor key primary and tie-breaker name the same field. A
    /// single-column "pair" cannot break ties.
    #[error("cursor key primary and tie-breaker are the same field {field:?}")]
    TieBreakerEqualsPrimary {
        /// The duplicated field name.
        field: String,
    },
    /// A cursor-mode request reached a call-site with no cursor key
    /// definition.
    #[error("cursor-mode request requires a cursor key definition")]
    CursorKeyMissing,
    /// Default sorts must always contain both cursor key fields, so that
    /// every fallback ordering keeps keyset pagination sound.
    #[error("default sorts must contain cursor key field {field:?}")]
    DefaultSortsMissingKey {
        /// The absent field name.
        field: String,
    },
}

/// Errors surfaced by [`Paginator::paginate`](crate::Paginator::paginate).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ListError {
    /// Caller/integration bug. See [`ConfigError`].
    #[error("list configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The supplied cursor token was rejected. See [`TokenError`].
    #[error("invalid cursor: {0}")]
    InvalidCursor(#[from] TokenError),
    /// The effective ordering (after whitelisting) does not include the
    /// cursor's primary field. Ordering without the cursor key would make
    /// keyset pagination unsound, so the request is rejected.
    #[error("effective ordering does not include cursor key field {field:?}")]
    OrderingMissingCursorKey {
        /// The absent cursor key field.
        field: String,
    },
    /// The token was minted for a different ordering than the one this
    /// request resolves to.
    #[error("cursor token was issued for ordering by {found:?}, expected {expected:?}")]
    ForeignCursor {
        /// Cursor key field of the current request.
        expected: String,
        /// Key field found inside the token.
        found: String,
    },
    /// A sort term survived whitelisting but has no safe column mapping.
    /// Only reachable when the allow-list and the resolver's mapping table
    /// disagree.
    #[error("cannot sort by field {field:?}: no column mapping")]
    IllegalSortField {
        /// The unresolvable field name.
        field: String,
    },
    /// The delegated query executor failed.
    #[error("query execution failed")]
    Executor(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ListError {
    /// True for faults caused by the request itself (reject the request;
    /// the client restarts pagination from the first page), false for
    /// integration or storage faults.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCursor(_)
                | Self::OrderingMissingCursorKey { .. }
                | Self::ForeignCursor { .. }
                | Self::IllegalSortField { .. }
        )
    }
}
