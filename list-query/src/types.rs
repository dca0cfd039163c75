//! Core request and value types shared across the engine.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    /// Ascending: `ASC`
    Asc,
    /// Descending: `DESC`
    Desc,
}

impl SortDir {
    /// SQL keyword for this direction.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// A single sort term over a business-visible field name.
///
/// `field` is a business-level name (e.g. `"createdAt"`), not a physical
/// column. Sequence order is significant: the first term of a sort list is
/// the primary ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Business-visible field name.
    pub field: String,
    /// Direction to sort the field in.
    pub dir: SortDir,
}

impl SortSpec {
    /// Create a new sort term.
    pub fn new(field: impl Into<String>, dir: SortDir) -> Self {
        Self {
            field: field.into(),
            dir,
        }
    }

    /// Parse a sort string like `"name,-createdAt"` into sort terms.
    ///
    /// Fields prefixed with `-` are sorted descending. Empty segments are
    /// skipped. No whitelisting happens here; that is the job of
    /// [`whitelist_sorts`](crate::policy::whitelist_sorts) and
    /// [`normalize_sorts`](crate::sort::normalize_sorts).
    #[must_use]
    pub fn parse_list(sort: &str) -> Vec<Self> {
        let mut result = Vec::new();

        for part in sort.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (field, dir) = if let Some(stripped) = part.strip_prefix('-') {
                (stripped, SortDir::Desc)
            } else {
                (part, SortDir::Asc)
            };

            result.push(Self::new(field, dir));
        }

        result
    }
}

/// Scalar values carried in cursor payloads and keyset predicates.
///
/// Serializes untagged, so a payload reads as plain JSON scalars
/// (`42`, `"2024-01-01"`, `true`, `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    /// SQL NULL.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// Text.
    String(String),
}

impl From<i64> for KeyValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for KeyValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for KeyValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for KeyValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for KeyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for KeyValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for KeyValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

/// A list request in exactly one pagination mode.
///
/// The two modes are separate variants so that invalid combinations
/// (both `page_size` and `limit` set, or a page number alongside a cursor
/// token) are unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PageRequest {
    /// Page-number pagination: skip-count paging with a total count.
    /// Simple and supports jump-to-page, but unstable under concurrent
    /// writes.
    Offset {
        /// 1-indexed page number. `0` is treated as page 1.
        page: u32,
        /// Rows per page. `0` means "use the call-site default".
        page_size: u32,
        /// Requested sort terms; may be empty.
        sorts: Vec<SortSpec>,
    },
    /// Keyset pagination by opaque, tamper-evident cursor tokens. Stable
    /// under concurrent inserts; no jump-to-page.
    Cursor {
        /// Row cap. `0` means "use the call-site default".
        limit: u32,
        /// Requested sort terms; may be empty.
        sorts: Vec<SortSpec>,
        /// Continue forward from this token.
        after: Option<String>,
        /// Continue backward from this token.
        before: Option<String>,
    },
}

impl PageRequest {
    /// Create an offset-mode request with no sorts.
    #[must_use]
    pub const fn offset(page: u32, page_size: u32) -> Self {
        Self::Offset {
            page,
            page_size,
            sorts: Vec::new(),
        }
    }

    /// Create a cursor-mode request with no sorts and no token.
    #[must_use]
    pub const fn cursor(limit: u32) -> Self {
        Self::Cursor {
            limit,
            sorts: Vec::new(),
            after: None,
            before: None,
        }
    }

    /// Add a sort term.
    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, dir: SortDir) -> Self {
        match &mut self {
            Self::Offset { sorts, .. } | Self::Cursor { sorts, .. } => {
                sorts.push(SortSpec::new(field, dir));
            },
        }
        self
    }

    /// Replace the sort list.
    #[must_use]
    pub fn with_sorts(mut self, new_sorts: Vec<SortSpec>) -> Self {
        match &mut self {
            Self::Offset { sorts, .. } | Self::Cursor { sorts, .. } => *sorts = new_sorts,
        }
        self
    }

    /// Continue forward from a token. No-op in offset mode.
    #[must_use]
    pub fn after(mut self, token: impl Into<String>) -> Self {
        if let Self::Cursor { after, .. } = &mut self {
            *after = Some(token.into());
        }
        self
    }

    /// Continue backward from a token. No-op in offset mode.
    #[must_use]
    pub fn before(mut self, token: impl Into<String>) -> Self {
        if let Self::Cursor { before, .. } = &mut self {
            *before = Some(token.into());
        }
        self
    }

    /// The requested sort terms, whichever mode is active.
    #[must_use]
    pub fn sorts(&self) -> &[SortSpec] {
        match self {
            Self::Offset { sorts, .. } | Self::Cursor { sorts, .. } => sorts,
        }
    }

    /// True for cursor-mode requests.
    #[must_use]
    pub const fn is_cursor(&self) -> bool {
        matches!(self, Self::Cursor { .. })
    }
}
