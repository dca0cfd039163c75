//! Sort-list normalization and cursor tie-breaker completion.

use crate::error::{ConfigError, ListError};
use crate::policy::whitelist_sorts;
use crate::types::SortSpec;

/// The two-column cursor key: a possibly non-unique primary sort field
/// plus a unique-enough tie-breaker.
///
/// Tie-breaking exists because the primary sort field (e.g. a timestamp)
/// is not guaranteed unique; without a secondary unique key, rows sharing
/// a primary value could straddle a page boundary inconsistently and be
/// skipped or duplicated as data is inserted concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorKeyDef {
    /// The primary sort field.
    pub primary: String,
    /// The tie-breaking field, expected unique per row.
    pub tie_breaker: String,
}

impl CursorKeyDef {
    /// Create a cursor key definition.
    pub fn new(primary: impl Into<String>, tie_breaker: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            tie_breaker: tie_breaker.into(),
        }
    }
}

/// Inputs to [`normalize_sorts`].
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct NormalizeInput<'a> {
    /// Sort terms from the request; may be empty.
    pub requested: &'a [SortSpec],
    /// Whitelisted business field names.
    pub allowed: &'a [&'a str],
    /// Call-site default sort terms.
    pub defaults: &'a [SortSpec],
    /// Cursor key, present only in cursor mode.
    pub cursor_key: Option<&'a CursorKeyDef>,
}

impl<'a> NormalizeInput<'a> {
    /// Bundle normalization inputs.
    #[must_use]
    pub const fn new(
        requested: &'a [SortSpec],
        allowed: &'a [&'a str],
        defaults: &'a [SortSpec],
        cursor_key: Option<&'a CursorKeyDef>,
    ) -> Self {
        Self {
            requested,
            allowed,
            defaults,
            cursor_key,
        }
    }
}

/// Produce the final, order-preserving sort list.
///
/// 1. The requested sorts (or the defaults, when none were requested) are
///    whitelisted; if that empties the list, the defaults apply
///    unfiltered.
/// 2. Without a cursor key, the filtered list is returned as-is.
/// 3. With a cursor key, the list must contain the primary field, the
///    tie-breaker is appended if absent (inheriting the primary's
///    direction), and the result is reordered so the key pair occupies
///    positions 0 and 1 while every other term keeps its relative order.
///
/// The fixed two-column head is what keeps the keyset comparison
/// mechanical, no matter how many cosmetic sort terms a caller adds.
///
/// # Errors
///
/// - [`ListError::Config`] when primary and tie-breaker name the same
///   field (a call-site bug).
/// - [`ListError::OrderingMissingCursorKey`] when the effective list
///   lacks the primary field.
pub fn normalize_sorts(input: &NormalizeInput<'_>) -> Result<Vec<SortSpec>, ListError> {
    let base = if input.requested.is_empty() {
        input.defaults
    } else {
        input.requested
    };

    let mut sorts = whitelist_sorts(base, input.allowed);
    if sorts.is_empty() {
        sorts = input.defaults.to_vec();
    }

    let Some(key) = input.cursor_key else {
        return Ok(sorts);
    };

    if key.primary == key.tie_breaker {
        return Err(ConfigError::TieBreakerEqualsPrimary {
            field: key.primary.clone(),
        }
        .into());
    }

    let Some(primary) = sorts.iter().find(|s| s.field == key.primary).cloned() else {
        return Err(ListError::OrderingMissingCursorKey {
            field: key.primary.clone(),
        });
    };

    // Tie-breaker keeps its own direction when present, otherwise inherits
    // the primary's.
    let tie_dir = sorts
        .iter()
        .find(|s| s.field == key.tie_breaker)
        .map_or(primary.dir, |s| s.dir);

    let mut out = Vec::with_capacity(sorts.len() + 1);
    out.push(primary);
    out.push(SortSpec::new(key.tie_breaker.clone(), tie_dir));
    out.extend(
        sorts
            .into_iter()
            .filter(|s| s.field != key.primary && s.field != key.tie_breaker),
    );

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TokenError;
    use crate::types::SortDir;

    fn spec(field: &str, dir: SortDir) -> SortSpec {
        SortSpec::new(field, dir)
    }

    #[test]
    fn test_disallowed_sorts_fall_back_to_defaults() {
        // allowed=["id","createdAt"], requested=[name ASC] -> defaults
        let requested = vec![spec("name", SortDir::Asc)];
        let defaults = vec![spec("createdAt", SortDir::Desc)];
        let out = normalize_sorts(&NormalizeInput::new(
            &requested,
            &["id", "createdAt"],
            &defaults,
            None,
        ))
        .unwrap();
        assert_eq!(out, defaults);
    }

    #[test]
    fn test_empty_request_uses_filtered_defaults() {
        let defaults = vec![spec("createdAt", SortDir::Desc), spec("secret", SortDir::Asc)];
        let out =
            normalize_sorts(&NormalizeInput::new(&[], &["createdAt"], &defaults, None)).unwrap();
        assert_eq!(out, vec![spec("createdAt", SortDir::Desc)]);
    }

    #[test]
    fn test_partial_filtering_keeps_survivors() {
        let requested = vec![spec("name", SortDir::Asc), spec("id", SortDir::Desc)];
        let defaults = vec![spec("createdAt", SortDir::Desc)];
        let out =
            normalize_sorts(&NormalizeInput::new(&requested, &["id"], &defaults, None)).unwrap();
        assert_eq!(out, vec![spec("id", SortDir::Desc)]);
    }

    #[test]
    fn test_tie_breaker_inherits_primary_direction() {
        // cursorKey={id, createdAt}, requested=[id DESC]
        // -> [{id, DESC}, {createdAt, DESC}]
        let key = CursorKeyDef::new("id", "createdAt");
        let requested = vec![spec("id", SortDir::Desc)];
        let defaults = vec![spec("id", SortDir::Asc), spec("createdAt", SortDir::Asc)];
        let out = normalize_sorts(&NormalizeInput::new(
            &requested,
            &["id", "createdAt"],
            &defaults,
            Some(&key),
        ))
        .unwrap();
        assert_eq!(
            out,
            vec![spec("id", SortDir::Desc), spec("createdAt", SortDir::Desc)]
        );
    }

    #[test]
    fn test_tie_breaker_keeps_own_direction_when_present() {
        let key = CursorKeyDef::new("createdAt", "id");
        let requested = vec![spec("createdAt", SortDir::Desc), spec("id", SortDir::Asc)];
        let defaults = requested.clone();
        let out = normalize_sorts(&NormalizeInput::new(
            &requested,
            &["id", "createdAt"],
            &defaults,
            Some(&key),
        ))
        .unwrap();
        assert_eq!(
            out,
            vec![spec("createdAt", SortDir::Desc), spec("id", SortDir::Asc)]
        );
    }

    #[test]
    fn test_key_pair_moves_to_head_and_rest_keeps_order() {
        let key = CursorKeyDef::new("createdAt", "id");
        let requested = vec![
            spec("title", SortDir::Asc),
            spec("price", SortDir::Desc),
            spec("createdAt", SortDir::Desc),
        ];
        let defaults = vec![spec("createdAt", SortDir::Desc), spec("id", SortDir::Asc)];
        let out = normalize_sorts(&NormalizeInput::new(
            &requested,
            &["title", "price", "createdAt", "id"],
            &defaults,
            Some(&key),
        ))
        .unwrap();
        assert_eq!(
            out,
            vec![
                spec("createdAt", SortDir::Desc),
                spec("id", SortDir::Desc),
                spec("title", SortDir::Asc),
                spec("price", SortDir::Desc),
            ]
        );
    }

    #[test]
    fn test_equal_key_fields_rejected() {
        let key = CursorKeyDef::new("id", "id");
        let defaults = vec![spec("id", SortDir::Asc)];
        let err =
            normalize_sorts(&NormalizeInput::new(&[], &["id"], &defaults, Some(&key))).unwrap_err();
        assert!(matches!(
            err,
            ListError::Config(ConfigError::TieBreakerEqualsPrimary { .. })
        ));
    }

    #[test]
    fn test_missing_primary_rejected() {
        let key = CursorKeyDef::new("id", "createdAt");
        let requested = vec![spec("title", SortDir::Asc)];
        let defaults = vec![spec("title", SortDir::Asc)];
        let err = normalize_sorts(&NormalizeInput::new(
            &requested,
            &["title"],
            &defaults,
            Some(&key),
        ))
        .unwrap_err();
        assert!(matches!(err, ListError::OrderingMissingCursorKey { .. }));
        assert!(err.is_client_error());
        // and it is a distinct failure from token-level errors
        assert!(!matches!(err, ListError::InvalidCursor(TokenError::Malformed)));
    }
}
