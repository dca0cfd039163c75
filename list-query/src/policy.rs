//! Pure pagination policy: caps, defaults, whitelisting.
//!
//! These functions know nothing about columns, tokens, or storage - they
//! operate only on the request shape, so any listing operation can reuse
//! them regardless of entity type.

use crate::types::{PageRequest, SortSpec};

/// Default page-size and sort values a call-site supplies for requests
/// that leave them unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDefaults {
    /// Page size / limit used when the request carries `0`.
    pub page_size: u32,
    /// Sort terms used when the request carries none.
    pub sorts: Vec<SortSpec>,
}

/// Fill in a missing/zero page size or limit, and substitute the default
/// sorts when the caller supplied none.
///
/// Offset mode additionally treats page `0` as page 1 (pages are
/// 1-indexed).
#[must_use]
pub fn apply_defaults(request: PageRequest, defaults: &PageDefaults) -> PageRequest {
    match request {
        PageRequest::Offset {
            page,
            page_size,
            sorts,
        } => PageRequest::Offset {
            page: if page == 0 { 1 } else { page },
            page_size: if page_size == 0 {
                defaults.page_size
            } else {
                page_size
            },
            sorts: if sorts.is_empty() {
                defaults.sorts.clone()
            } else {
                sorts
            },
        },
        PageRequest::Cursor {
            limit,
            sorts,
            after,
            before,
        } => PageRequest::Cursor {
            limit: if limit == 0 { defaults.page_size } else { limit },
            sorts: if sorts.is_empty() {
                defaults.sorts.clone()
            } else {
                sorts
            },
            after,
            before,
        },
    }
}

/// Clamp the page size (offset mode) or limit (cursor mode) to `max`.
///
/// `max == 0` disables the cap entirely. That escape hatch exists for
/// trusted internal callers only; never expose it to untrusted input
/// paths, since it allows unbounded result sets.
#[must_use]
pub fn enforce_max_page_size(request: PageRequest, max: u32) -> PageRequest {
    if max == 0 {
        return request;
    }
    match request {
        PageRequest::Offset {
            page,
            page_size,
            sorts,
        } => PageRequest::Offset {
            page,
            page_size: page_size.min(max),
            sorts,
        },
        PageRequest::Cursor {
            limit,
            sorts,
            after,
            before,
        } => PageRequest::Cursor {
            limit: limit.min(max),
            sorts,
            after,
            before,
        },
    }
}

/// Filter a sort list down to whitelisted field names.
///
/// Given no sorts this returns an empty list (not the input), signaling
/// "nothing to whitelist" rather than "everything allowed". An empty
/// `allowed` list likewise passes nothing through.
#[must_use]
pub fn whitelist_sorts(sorts: &[SortSpec], allowed: &[&str]) -> Vec<SortSpec> {
    sorts
        .iter()
        .filter(|s| allowed.contains(&s.field.as_str()))
        .cloned()
        .collect()
}
