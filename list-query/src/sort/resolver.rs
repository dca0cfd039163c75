//! Business-field to storage-column resolution.

use std::collections::BTreeMap;

/// Maximum length for SQL identifiers (`PostgreSQL` limit is 63).
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validate that a string is a safe column reference.
///
/// A valid reference is either a bare identifier (`created_at`) or a
/// single-qualified one (`course.created_at`). Each identifier:
/// - Starts with a letter (a-z, A-Z) or underscore
/// - Contains only letters, digits (0-9), and underscores
/// - Is not empty and not longer than 63 characters
///
/// This rejects quotes, semicolons, comment markers, and any Unicode that
/// could smuggle structure into an ORDER BY clause.
///
/// # Examples
///
/// ```
/// use list_query::is_valid_column_reference;
///
/// assert!(is_valid_column_reference("created_at"));
/// assert!(is_valid_column_reference("course.created_at"));
///
/// assert!(!is_valid_column_reference(""));                // empty
/// assert!(!is_valid_column_reference("a.b.c"));           // double-qualified
/// assert!(!is_valid_column_reference("id; DROP TABLE x")); // injection
/// ```
#[inline]
#[must_use]
pub fn is_valid_column_reference(s: &str) -> bool {
    let mut parts = s.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(column), None, None) => is_valid_identifier(column),
        (Some(table), Some(column), None) => {
            is_valid_identifier(table) && is_valid_identifier(column)
        },
        _ => false,
    }
}

fn is_valid_identifier(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    let mut chars = s.chars();

    // First character must be letter or underscore
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }

    // Rest must be letters, digits, or underscores
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Maps business-visible field names to storage-qualified columns.
///
/// One resolver is defined per entity type, at integration time. The map
/// is the injection boundary: only columns registered here can ever reach
/// an ORDER BY clause, and every registered column is validated against
/// [`is_valid_column_reference`] at construction.
///
/// Resolvers are read-only after construction and may be shared across
/// concurrent requests.
///
/// # Example
///
/// ```
/// use list_query::SortResolver;
///
/// let resolver = SortResolver::new()
///     .map_field("id", "course.id")
///     .map_field("createdAt", "course.created_at");
///
/// assert_eq!(resolver.resolve_column("createdAt"), Some("course.created_at"));
/// assert_eq!(resolver.resolve_column("password"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SortResolver {
    columns: BTreeMap<String, String>,
}

impl SortResolver {
    /// Create an empty resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: BTreeMap::new(),
        }
    }

    /// Register a field-to-column mapping.
    ///
    /// # Panics
    ///
    /// Panics if `column` is not a safe column reference. Mappings come
    /// from code, not user input, so an invalid one is a programmer error.
    #[must_use]
    pub fn map_field(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        let column = column.into();
        assert!(
            is_valid_column_reference(&column),
            "invalid column reference '{column}': must be `column` or `table.column` \
             with identifiers of 1-63 ASCII alphanumeric/underscore chars"
        );
        self.columns.insert(field.into(), column);
        self
    }

    /// Resolve a business field name to its column reference.
    ///
    /// Returns `None` for any unmapped field. Never errors - absence is a
    /// normal, checked outcome; the caller decides whether an unresolved
    /// column is fatal for its operation.
    #[must_use]
    pub fn resolve_column(&self, field: &str) -> Option<&str> {
        self.columns.get(field).map(String::as_str)
    }

    /// The mapped business field names, in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}
