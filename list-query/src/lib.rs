// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code items in docs - extensive doc changes needed
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::missing_panics_doc)] // # Panics sections - doc-heavy
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self by design
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use

//! # list-query - Pagination and Sort Resolution for List Endpoints
//!
//! Turns untrusted list-request parameters (page, limit, sort, cursor)
//! into validated query instructions and a uniform page envelope.
//! Supports offset pagination and HMAC-signed keyset cursors.
//!
//! ## Quick Start
//!
//! ```
//! use list_query::prelude::*;
//!
//! // Wire once at integration time
//! let resolver = SortResolver::new()
//!     .map_field("id", "course.id")
//!     .map_field("createdAt", "course.created_at");
//! let rules = ListRules::new()
//!     .allow_sorts(&["id", "createdAt"])
//!     .default_sort("createdAt", SortDir::Desc)
//!     .default_sort("id", SortDir::Desc)
//!     .max_page_size(100)
//!     .cursor_key("createdAt", "id");
//!
//! // Per request: parse client sorts, defaults fill in the rest
//! let sorts = SortSpec::parse_list("-createdAt");
//! let request = PageRequest::offset(1, 20).with_sorts(sorts);
//! assert!(!request.is_cursor());
//! ```
//!
//! ## Guarantees
//!
//! - Client sort fields never reach SQL text: unknown fields are dropped
//!   against the allow-list, then mapped through [`SortResolver`] to
//!   storage columns, so injection via sort parameters is impossible.
//! - Every cursor-mode ordering ends in a unique tie-breaking key pair;
//!   keyset scans return each row exactly once, in order, even when
//!   primary sort values repeat.
//! - Cursor tokens are HMAC-SHA256 signed; any tampering, truncation, or
//!   token minted under a different key is rejected before it can shape a
//!   query.
//!
//! ## Cursor tokens
//!
//! `base64url(json payload) . base64url(hmac-sha256)`, unpadded. Clients
//! must treat tokens as opaque; the payload layout may change without
//! notice and verification rejects anything a current signer did not
//! mint.

mod dialect;
mod error;
mod paginate;
mod policy;
mod sort;
mod token;
mod types;

pub use dialect::{Dialect, Postgres, Sqlite};
pub use error::{ConfigError, ListError, TokenError};
pub use paginate::{
    ColumnBound, ExecutorError, KeyCmp, KeysetPredicate, ListRules, PageInfo, PageQuery, PageRows,
    Paginated, Paginator, QueryExecutor,
};
pub use policy::{PageDefaults, apply_defaults, enforce_max_page_size, whitelist_sorts};
pub use sort::{
    CursorKeyDef, NormalizeInput, SortResolver, is_valid_column_reference, normalize_sorts,
};
pub use token::{CursorBound, CursorClaims, CursorSigner};
pub use types::{KeyValue, PageRequest, SortDir, SortSpec};

/// Prelude module for convenient imports.
///
/// ```
/// use list_query::prelude::*;
/// let rules = ListRules::new().allow_sorts(&["id"]).default_sort("id", SortDir::Asc);
/// let _ = rules;
/// ```
pub mod prelude {
    pub use crate::{
        CursorSigner, KeyValue, ListError, ListRules, PageInfo, PageQuery, PageRequest, PageRows,
        Paginated, Paginator, QueryExecutor, SortDir, SortResolver, SortSpec,
    };
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
