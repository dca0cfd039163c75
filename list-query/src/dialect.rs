//! SQL dialect support for rendering pagination fragments.
//!
//! The engine itself only emits structured instructions; the dialect is
//! consulted when an executor asks a fragment to render itself as
//! parameterized SQL.

/// Database-specific placeholder syntax.
pub trait Dialect: std::fmt::Debug + Clone + Copy {
    /// Format a parameter placeholder (e.g., `$1` for Postgres, `?1` for
    /// `SQLite`).
    fn param(&self, idx: usize) -> String;
}

/// Postgres dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("${idx}")
    }
}

/// `SQLite` dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("?{idx}")
    }
}
