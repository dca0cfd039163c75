//! Pagination orchestration: the single entry point every listing
//! operation calls.
//!
//! # Pagination Strategies
//!
//! | Strategy   | Jump to Page | Performance | Stability | Use Case               |
//! |------------|--------------|-------------|-----------|------------------------|
//! | **Offset** | Yes          | O(n) skip   | Unstable* | Admin panels, reports  |
//! | **Cursor** | No           | O(1)        | Stable    | Feeds, infinite scroll |
//!
//! *Unstable = offset pages can skip or repeat rows when data changes
//! between requests. Cursor mode's keyset predicate returns each row
//! exactly once, in order, regardless of concurrent inserts elsewhere in
//! the dataset.
//!
//! The orchestrator holds no state between calls - each invocation is a
//! pure request-to-response step, and cursor tokens are the only state
//! carried across calls, living entirely in the client's hands.
//!
//! # Example
//!
//! ```
//! use list_query::{
//!     CursorSigner, KeyValue, ListRules, PageQuery, PageRequest, PageRows, Paginated,
//!     Paginator, QueryExecutor, SortDir, SortResolver,
//! };
//!
//! #[derive(Clone)]
//! struct Course {
//!     id: i64,
//!     created_at: String,
//! }
//!
//! struct FixedExecutor(Vec<Course>);
//!
//! impl QueryExecutor<Course> for FixedExecutor {
//!     fn fetch_page(
//!         &self,
//!         query: &PageQuery,
//!     ) -> Result<PageRows<Course>, Box<dyn std::error::Error + Send + Sync>> {
//!         let mut rows = self.0.clone();
//!         rows.truncate(query.limit as usize);
//!         Ok(PageRows { rows, total: Some(self.0.len() as u64) })
//!     }
//! }
//!
//! let resolver = SortResolver::new()
//!     .map_field("id", "course.id")
//!     .map_field("createdAt", "course.created_at");
//! let rules = ListRules::new()
//!     .allow_sorts(&["id", "createdAt"])
//!     .default_sort("createdAt", SortDir::Desc)
//!     .default_sort("id", SortDir::Desc)
//!     .cursor_key("createdAt", "id");
//! let signer = CursorSigner::insecure_dev();
//! let executor = FixedExecutor(vec![Course { id: 1, created_at: "2024-01-01".into() }]);
//!
//! let paginator = Paginator::new(&resolver, &signer, &executor);
//! let page: Paginated<Course> = paginator
//!     .paginate(PageRequest::cursor(10), &rules, |c: &Course| {
//!         (KeyValue::from(c.created_at.as_str()), KeyValue::from(c.id))
//!     })
//!     .unwrap();
//! assert_eq!(page.items.len(), 1);
//! assert!(!page.has_next());
//! ```

mod keyset;
mod page;

pub use keyset::{ColumnBound, KeyCmp, KeysetPredicate};
pub use page::{PageInfo, Paginated};

use tracing::{debug, warn};

use crate::error::{ConfigError, ListError};
use crate::policy::{self, PageDefaults};
use crate::sort::{CursorKeyDef, NormalizeInput, SortResolver, normalize_sorts};
use crate::token::{CursorBound, CursorClaims, CursorSigner};
use crate::types::{KeyValue, PageRequest, SortDir, SortSpec};

/// Boxed executor error, wrapped unmodified into
/// [`ListError::Executor`].
pub type ExecutorError = Box<dyn std::error::Error + Send + Sync>;

/// Ordering and filtering instructions handed to the query executor.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct PageQuery {
    /// Resolved `(column, direction)` terms. The executor must apply them
    /// in exactly this sequence.
    pub order_by: Vec<(String, SortDir)>,
    /// Keyset boundary; `None` in offset mode and on the first cursor
    /// page.
    pub predicate: Option<KeysetPredicate>,
    /// Row cap for this page.
    pub limit: u32,
    /// Rows to skip; `None` in cursor mode.
    pub offset: Option<u64>,
}

impl PageQuery {
    /// Render the ORDER BY clause body, e.g.
    /// `course.created_at DESC, course.id DESC`.
    #[must_use]
    pub fn order_by_sql(&self) -> String {
        self.order_by
            .iter()
            .map(|(column, dir)| format!("{column} {}", dir.as_sql()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A fetched page of rows plus, in offset mode, the total matching-row
/// count.
///
/// Constructed by executor implementations outside this crate.
#[allow(clippy::exhaustive_structs)]
#[derive(Debug, Clone)]
pub struct PageRows<T> {
    /// Rows in the executor's returned order.
    pub rows: Vec<T>,
    /// Total matching rows. Offset mode requires it; cursor mode ignores
    /// it.
    pub total: Option<u64>,
}

/// The external query execution boundary.
///
/// Implementations run the generated ordering, predicate, and limit
/// against storage. This is the engine's only I/O point; cancellation and
/// timeouts are the executor's concern.
pub trait QueryExecutor<T> {
    /// Execute the query and return the page of rows.
    fn fetch_page(&self, query: &PageQuery) -> Result<PageRows<T>, ExecutorError>;
}

/// Per-entity listing rules: sort allow-list, defaults, caps, and the
/// cursor key definition.
///
/// This is configuration, not runtime data - build one per entity type at
/// integration time and share it across requests.
///
/// # Example
///
/// ```
/// use list_query::{ListRules, SortDir};
///
/// let rules = ListRules::new()
///     .allow_sorts(&["id", "createdAt", "title"])
///     .default_sort("createdAt", SortDir::Desc)
///     .default_sort("id", SortDir::Desc)
///     .default_page_size(20)
///     .max_page_size(100)
///     .cursor_key("createdAt", "id");
/// ```
#[derive(Debug, Clone)]
pub struct ListRules {
    allowed_sorts: Vec<String>,
    default_sorts: Vec<SortSpec>,
    default_page_size: u32,
    max_page_size: u32,
    cursor_key: Option<CursorKeyDef>,
}

impl ListRules {
    /// Create rules with an empty allow-list, page size 20, and cap 100.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            allowed_sorts: Vec::new(),
            default_sorts: Vec::new(),
            default_page_size: 20,
            max_page_size: 100,
            cursor_key: None,
        }
    }

    /// Set the whitelisted sort field names.
    #[must_use]
    pub fn allow_sorts(mut self, fields: &[&str]) -> Self {
        self.allowed_sorts = fields.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Append a default sort term.
    #[must_use]
    pub fn default_sort(mut self, field: impl Into<String>, dir: SortDir) -> Self {
        self.default_sorts.push(SortSpec::new(field, dir));
        self
    }

    /// Page size used when a request leaves it unset.
    #[must_use]
    pub const fn default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }

    /// Hard cap on the page size, the sole backpressure control.
    ///
    /// `0` disables the cap - a deliberate escape hatch for trusted
    /// internal callers; never expose an uncapped rule set to untrusted
    /// input, since it allows unbounded result sets.
    #[must_use]
    pub const fn max_page_size(mut self, max: u32) -> Self {
        self.max_page_size = max;
        self
    }

    /// Define the cursor key pair, enabling cursor-mode requests. Both
    /// fields must also appear in the default sorts.
    #[must_use]
    pub fn cursor_key(mut self, primary: &str, tie_breaker: &str) -> Self {
        self.cursor_key = Some(CursorKeyDef::new(primary, tie_breaker));
        self
    }
}

impl Default for ListRules {
    fn default() -> Self {
        Self::new()
    }
}

/// Composes the pagination policy, sort resolver, and cursor codec around
/// an executor.
///
/// Collaborators are passed explicitly; the paginator itself is stateless
/// and freely shareable.
#[derive(Debug)]
pub struct Paginator<'a, E> {
    resolver: &'a SortResolver,
    signer: &'a CursorSigner,
    executor: &'a E,
}

impl<'a, E> Paginator<'a, E> {
    /// Create a paginator over its three collaborators.
    #[must_use]
    pub const fn new(resolver: &'a SortResolver, signer: &'a CursorSigner, executor: &'a E) -> Self {
        Self {
            resolver,
            signer,
            executor,
        }
    }

    /// Run one list operation.
    ///
    /// `key_fn` extracts the `(primary, tie_breaker)` key values from a
    /// row; it is only consulted in cursor mode, when minting boundary
    /// tokens.
    ///
    /// # Errors
    ///
    /// See [`ListError`] for the taxonomy: configuration bugs fail fast,
    /// invalid cursors and unresolvable sort fields reject the request,
    /// and executor failures are wrapped unmodified.
    pub fn paginate<T, F>(
        &self,
        request: PageRequest,
        rules: &ListRules,
        key_fn: F,
    ) -> Result<Paginated<T>, ListError>
    where
        E: QueryExecutor<T>,
        F: Fn(&T) -> (KeyValue, KeyValue),
    {
        // Cursor-mode call-sites must be wired with a cursor key whose
        // fields are guaranteed present in the default sorts. These are
        // integration bugs, checked before any request data is touched.
        if request.is_cursor() {
            let Some(key) = rules.cursor_key.as_ref() else {
                return Err(ConfigError::CursorKeyMissing.into());
            };
            for field in [&key.primary, &key.tie_breaker] {
                if !rules.default_sorts.iter().any(|s| &s.field == field) {
                    return Err(ConfigError::DefaultSortsMissingKey {
                        field: field.clone(),
                    }
                    .into());
                }
            }
        }

        let defaults = PageDefaults {
            page_size: rules.default_page_size,
            sorts: rules.default_sorts.clone(),
        };
        let request =
            policy::enforce_max_page_size(policy::apply_defaults(request, &defaults), rules.max_page_size);

        let allowed: Vec<&str> = rules.allowed_sorts.iter().map(String::as_str).collect();
        let cursor_key = if request.is_cursor() {
            rules.cursor_key.as_ref()
        } else {
            None
        };
        let sorts = normalize_sorts(&NormalizeInput::new(
            request.sorts(),
            &allowed,
            &rules.default_sorts,
            cursor_key,
        ))?;

        let mut order_by = Vec::with_capacity(sorts.len());
        for sort in &sorts {
            let column = self.resolver.resolve_column(&sort.field).ok_or_else(|| {
                ListError::IllegalSortField {
                    field: sort.field.clone(),
                }
            })?;
            order_by.push((column.to_string(), sort.dir));
        }

        match request {
            PageRequest::Offset {
                page, page_size, ..
            } => {
                let query = PageQuery {
                    order_by,
                    predicate: None,
                    limit: page_size,
                    offset: Some(u64::from(page.saturating_sub(1)) * u64::from(page_size)),
                };
                debug!(page, page_size, "executing offset list query");
                let result = self.executor.fetch_page(&query).map_err(ListError::Executor)?;
                let total = result.total.unwrap_or(result.rows.len() as u64);
                Ok(Paginated {
                    items: result.rows,
                    page_info: PageInfo::Offset {
                        page,
                        page_size,
                        total,
                    },
                })
            },
            PageRequest::Cursor {
                limit,
                after,
                before,
                ..
            } => {
                let Some(key) = rules.cursor_key.as_ref() else {
                    return Err(ConfigError::CursorKeyMissing.into());
                };
                // normalize_sorts pinned the key pair to positions 0 and 1
                let (Some(primary_sort), Some(tie_sort)) = (sorts.first(), sorts.get(1)) else {
                    return Err(ListError::OrderingMissingCursorKey {
                        field: key.primary.clone(),
                    });
                };
                let (primary_col, tie_col) = match (order_by.first(), order_by.get(1)) {
                    (Some((p, _)), Some((t, _))) => (p.clone(), t.clone()),
                    _ => {
                        return Err(ListError::OrderingMissingCursorKey {
                            field: key.primary.clone(),
                        });
                    },
                };

                // `after` wins when both tokens are supplied
                let inbound = match (after.as_deref(), before.as_deref()) {
                    (Some(token), _) => Some((token, true)),
                    (None, Some(token)) => Some((token, false)),
                    (None, None) => None,
                };

                let predicate = match inbound {
                    Some((token, forward)) => {
                        let claims = self.signer.verify(token).map_err(|err| {
                            warn!(%err, "rejected cursor token");
                            err
                        })?;
                        check_claims_match_key(&claims, key)?;
                        Some(KeysetPredicate::from_claims(
                            &claims,
                            &primary_col,
                            &tie_col,
                            forward,
                        ))
                    },
                    None => None,
                };

                let primary_dir = primary_sort.dir;
                let tie_dir = tie_sort.dir;
                let had_after = after.is_some();
                let backward = matches!(inbound, Some((_, false)));

                // A backward page scans away from the boundary, so the
                // query runs with every direction reversed and the rows
                // are flipped back afterwards. This is what makes a
                // `before` page the rows *adjacent* to the boundary,
                // rather than the head of the dataset.
                let mut order_by = order_by;
                if backward {
                    for (_, dir) in &mut order_by {
                        *dir = dir.reversed();
                    }
                }

                let query = PageQuery {
                    order_by,
                    predicate,
                    limit,
                    offset: None,
                };
                debug!(limit, has_cursor = inbound.is_some(), backward, "executing cursor list query");
                let result = self.executor.fetch_page(&query).map_err(ListError::Executor)?;
                let mut rows = result.rows;
                if backward {
                    rows.reverse();
                }

                let full_page = limit > 0 && rows.len() as u64 >= u64::from(limit);
                let mint = |row: &T| {
                    self.signer
                        .sign(&boundary_claims(row, &key_fn, key, primary_dir, tie_dir))
                };

                let (next_cursor, prev_cursor) = if backward {
                    // The boundary row sits immediately after the last
                    // returned row, so a next token exists whenever the
                    // page is non-empty. A full fetch means more rows
                    // precede this page.
                    (
                        rows.last().map(&mint),
                        if full_page { rows.first().map(&mint) } else { None },
                    )
                } else {
                    // A full page means there may be more data after it;
                    // an inbound `after` token proves rows exist before
                    // this page. A short page is end-of-data.
                    (
                        if full_page { rows.last().map(&mint) } else { None },
                        if had_after { rows.first().map(&mint) } else { None },
                    )
                };

                Ok(Paginated {
                    items: rows,
                    page_info: PageInfo::Cursor {
                        next_cursor,
                        prev_cursor,
                    },
                })
            },
        }
    }
}

fn check_claims_match_key(claims: &CursorClaims, key: &CursorKeyDef) -> Result<(), ListError> {
    if claims.primary.field != key.primary {
        return Err(ListError::ForeignCursor {
            expected: key.primary.clone(),
            found: claims.primary.field.clone(),
        });
    }
    if claims.tie_breaker.field != key.tie_breaker {
        return Err(ListError::ForeignCursor {
            expected: key.tie_breaker.clone(),
            found: claims.tie_breaker.field.clone(),
        });
    }
    Ok(())
}

fn boundary_claims<T, F>(
    row: &T,
    key_fn: &F,
    key: &CursorKeyDef,
    primary_dir: SortDir,
    tie_dir: SortDir,
) -> CursorClaims
where
    F: Fn(&T) -> (KeyValue, KeyValue),
{
    let (primary_value, tie_value) = key_fn(row);
    CursorClaims::new(
        CursorBound::new(key.primary.clone(), primary_value, primary_dir),
        CursorBound::new(key.tie_breaker.clone(), tie_value, tie_dir),
    )
}
