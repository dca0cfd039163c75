//! End-to-end pagination tests against a real SQLite database.
//!
//! These tests validate that the rendered ORDER BY and keyset fragments
//! are SQL an actual engine accepts, and that cursor walks hold the
//! no-skip / no-duplicate guarantee over data with duplicated primary
//! sort values - including while rows are inserted mid-walk.

use list_query::{
    CursorSigner, KeyValue, ListRules, PageInfo, PageQuery, PageRequest, PageRows, Paginated,
    Paginator, QueryExecutor, Sqlite, SortDir, SortResolver,
};
use rusqlite::Connection;

#[derive(Debug, Clone, PartialEq)]
struct Course {
    id: i64,
    title: String,
    created_at: String,
}

struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    fn seed() -> Self {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE courses (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                created_at TEXT NOT NULL
            );",
        )
        .unwrap();
        // created_at duplicated across rows so the tie-breaker does real work
        let rows = [
            (1, "Rust Basics", "2024-01-01"),
            (2, "Advanced Rust", "2024-01-01"),
            (3, "SQL Deep Dive", "2024-01-02"),
            (4, "Indexing", "2024-01-02"),
            (5, "Query Planning", "2024-01-02"),
            (6, "HTTP APIs", "2024-01-03"),
            (7, "Streaming", "2024-01-03"),
            (8, "Observability", "2024-01-04"),
            (9, "Deployment", "2024-01-05"),
            (10, "Maintenance", "2024-01-05"),
        ];
        for (id, title, created_at) in rows {
            conn.execute(
                "INSERT INTO courses (id, title, created_at) VALUES (?1, ?2, ?3)",
                (id, title, created_at),
            )
            .unwrap();
        }
        Self { conn }
    }

    fn insert(&self, id: i64, title: &str, created_at: &str) {
        self.conn
            .execute(
                "INSERT INTO courses (id, title, created_at) VALUES (?1, ?2, ?3)",
                (id, title, created_at),
            )
            .unwrap();
    }

    /// Reference ordering straight from SQLite, bypassing pagination.
    fn full_scan(&self, order_by: &str) -> Vec<i64> {
        let sql = format!("SELECT c.id FROM courses c ORDER BY {order_by}");
        let mut stmt = self.conn.prepare(&sql).unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }
}

fn to_sqlite_value(value: &KeyValue) -> rusqlite::types::Value {
    match value {
        KeyValue::Null => rusqlite::types::Value::Null,
        KeyValue::Bool(b) => rusqlite::types::Value::Integer(i64::from(*b)),
        KeyValue::Int(i) => rusqlite::types::Value::Integer(*i),
        KeyValue::Float(f) => rusqlite::types::Value::Real(*f),
        KeyValue::String(s) => rusqlite::types::Value::Text(s.clone()),
    }
}

impl QueryExecutor<Course> for SqliteExecutor {
    fn fetch_page(
        &self,
        query: &PageQuery,
    ) -> Result<PageRows<Course>, Box<dyn std::error::Error + Send + Sync>> {
        let mut sql = String::from("SELECT c.id, c.title, c.created_at FROM courses c");
        let mut params: Vec<rusqlite::types::Value> = Vec::new();

        if let Some(predicate) = &query.predicate {
            let (fragment, values, _next) = predicate.to_sql(Sqlite, 1);
            sql.push_str(" WHERE ");
            sql.push_str(&fragment);
            params.extend(values.iter().map(to_sqlite_value));
        }

        sql.push_str(" ORDER BY ");
        sql.push_str(&query.order_by_sql());
        sql.push_str(&format!(" LIMIT {}", query.limit));
        if let Some(offset) = query.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params), |row| {
                Ok(Course {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let total = if query.offset.is_some() {
            let count: u64 =
                self.conn
                    .query_row("SELECT COUNT(*) FROM courses", [], |row| row.get(0))?;
            Some(count)
        } else {
            None
        };

        Ok(PageRows { rows, total })
    }
}

fn resolver() -> SortResolver {
    SortResolver::new()
        .map_field("id", "c.id")
        .map_field("title", "c.title")
        .map_field("createdAt", "c.created_at")
}

fn rules() -> ListRules {
    ListRules::new()
        .allow_sorts(&["id", "title", "createdAt"])
        .default_sort("createdAt", SortDir::Desc)
        .default_sort("id", SortDir::Desc)
        .default_page_size(20)
        .max_page_size(100)
        .cursor_key("createdAt", "id")
}

fn key_fn(course: &Course) -> (KeyValue, KeyValue) {
    (
        KeyValue::from(course.created_at.as_str()),
        KeyValue::from(course.id),
    )
}

/// Walk the full dataset in pages, returning every id in visit order.
fn walk(
    paginator: &Paginator<'_, SqliteExecutor>,
    rules: &ListRules,
    limit: u32,
    sorts: &[(&str, SortDir)],
) -> Vec<i64> {
    let mut seen = Vec::new();
    let mut after: Option<String> = None;
    for _ in 0..64 {
        let mut request = PageRequest::cursor(limit);
        for (field, dir) in sorts {
            request = request.sort(*field, *dir);
        }
        if let Some(token) = &after {
            request = request.after(token.clone());
        }
        let page: Paginated<Course> = paginator.paginate(request, rules, key_fn).unwrap();
        seen.extend(page.items.iter().map(|c| c.id));
        let PageInfo::Cursor { next_cursor, .. } = page.page_info else {
            panic!("expected cursor page info");
        };
        match next_cursor {
            Some(token) => after = Some(token),
            None => return seen,
        }
    }
    panic!("cursor walk did not terminate");
}

#[test]
fn test_offset_pages_against_sqlite() {
    let executor = SqliteExecutor::seed();
    let resolver = resolver();
    let signer = CursorSigner::insecure_dev();
    let paginator = Paginator::new(&resolver, &signer, &executor);
    let rules = rules();

    let page = paginator
        .paginate(PageRequest::offset(2, 4), &rules, key_fn)
        .unwrap();
    // ordering: createdAt DESC, id DESC over ids 1..=10
    assert_eq!(
        page.items.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![6, 5, 4, 3]
    );
    assert_eq!(
        page.page_info,
        PageInfo::Offset {
            page: 2,
            page_size: 4,
            total: 10
        }
    );
}

#[test]
fn test_cursor_walk_matches_full_scan() {
    let executor = SqliteExecutor::seed();
    let expected = executor.full_scan("c.created_at DESC, c.id DESC");

    let resolver = resolver();
    let signer = CursorSigner::insecure_dev();
    let paginator = Paginator::new(&resolver, &signer, &executor);

    for limit in [1, 2, 3, 7, 10, 50] {
        let seen = walk(&paginator, &rules(), limit, &[]);
        assert_eq!(seen, expected, "page size {limit} must not skip or repeat");
    }
}

#[test]
fn test_mixed_direction_walk_matches_full_scan() {
    // createdAt DESC with id ASC forces the OR-expansion predicate form
    let executor = SqliteExecutor::seed();
    let expected = executor.full_scan("c.created_at DESC, c.id ASC");

    let resolver = resolver();
    let signer = CursorSigner::insecure_dev();
    let paginator = Paginator::new(&resolver, &signer, &executor);

    let sorts = [("createdAt", SortDir::Desc), ("id", SortDir::Asc)];
    for limit in [1, 3, 4] {
        let seen = walk(&paginator, &rules(), limit, &sorts);
        assert_eq!(seen, expected, "page size {limit} must not skip or repeat");
    }
}

#[test]
fn test_ascending_walk_matches_full_scan() {
    let executor = SqliteExecutor::seed();
    let expected = executor.full_scan("c.created_at ASC, c.id ASC");

    let resolver = resolver();
    let signer = CursorSigner::insecure_dev();
    let paginator = Paginator::new(&resolver, &signer, &executor);

    let seen = walk(&paginator, &rules(), 3, &[("createdAt", SortDir::Asc)]);
    assert_eq!(seen, expected);
}

#[test]
fn test_walk_is_stable_under_concurrent_inserts() {
    let executor = SqliteExecutor::seed();
    let resolver = resolver();
    let signer = CursorSigner::insecure_dev();
    let paginator = Paginator::new(&resolver, &signer, &executor);
    let rules = rules();

    // First page of the DESC scan
    let page = paginator
        .paginate(PageRequest::cursor(3), &rules, key_fn)
        .unwrap();
    let mut seen: Vec<i64> = page.items.iter().map(|c| c.id).collect();
    assert_eq!(seen, vec![10, 9, 8]);
    let PageInfo::Cursor { next_cursor, .. } = page.page_info else {
        panic!("expected cursor page info");
    };

    // A row newer than the boundary lands before the cursor position and
    // must not disturb the remaining pages
    executor.insert(11, "Hotfixes", "2024-01-06");

    let mut after = next_cursor;
    while let Some(token) = after {
        let page = paginator
            .paginate(PageRequest::cursor(3).after(token), &rules, key_fn)
            .unwrap();
        seen.extend(page.items.iter().map(|c| c.id));
        let PageInfo::Cursor { next_cursor, .. } = page.page_info else {
            panic!("expected cursor page info");
        };
        after = next_cursor;
    }

    // every pre-existing row exactly once, none repeated after the insert
    assert_eq!(seen, vec![10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
}

#[test]
fn test_before_walk_visits_adjacent_pages_in_reverse() {
    let executor = SqliteExecutor::seed();
    let expected = executor.full_scan("c.created_at DESC, c.id DESC");

    let resolver = resolver();
    let signer = CursorSigner::insecure_dev();
    let paginator = Paginator::new(&resolver, &signer, &executor);
    let rules = rules();

    // walk forward to the last page: [10,9,8] [7,6,5] [4,3,2] [1]
    let mut after: Option<String> = None;
    let mut prev = loop {
        let mut request = PageRequest::cursor(3);
        if let Some(token) = &after {
            request = request.after(token.clone());
        }
        let page = paginator.paginate(request, &rules, key_fn).unwrap();
        let PageInfo::Cursor { next_cursor, prev_cursor } = page.page_info else {
            panic!("expected cursor page info");
        };
        match next_cursor {
            Some(token) => after = Some(token),
            None => break prev_cursor,
        }
    };

    // walk backward, collecting each page in its presented order
    let mut pages = Vec::new();
    while let Some(token) = prev {
        let page = paginator
            .paginate(PageRequest::cursor(3).before(token), &rules, key_fn)
            .unwrap();
        let ids: Vec<i64> = page.items.iter().map(|c| c.id).collect();
        let PageInfo::Cursor { prev_cursor, .. } = page.page_info else {
            panic!("expected cursor page info");
        };
        if ids.is_empty() {
            break;
        }
        pages.push(ids);
        prev = prev_cursor;
    }

    // each backward page is the exact predecessor of the page it was
    // minted from, and replaying them in reverse restores the full scan
    assert_eq!(
        pages,
        vec![vec![4, 3, 2], vec![7, 6, 5], vec![10, 9, 8]]
    );
    let mut replayed: Vec<i64> = pages.into_iter().rev().flatten().collect();
    replayed.push(1);
    assert_eq!(replayed, expected);
}

#[test]
fn test_cursor_from_one_ordering_rejected_under_another() {
    let executor = SqliteExecutor::seed();
    let resolver = resolver();
    let signer = CursorSigner::insecure_dev();
    let paginator = Paginator::new(&resolver, &signer, &executor);

    let rules_by_created = rules();
    let rules_by_id = ListRules::new()
        .allow_sorts(&["id", "title"])
        .default_sort("id", SortDir::Asc)
        .default_sort("title", SortDir::Asc)
        .cursor_key("id", "title");

    let page = paginator
        .paginate(PageRequest::cursor(3), &rules_by_created, key_fn)
        .unwrap();
    let PageInfo::Cursor { next_cursor, .. } = page.page_info else {
        panic!("expected cursor page info");
    };

    let err = paginator
        .paginate(
            PageRequest::cursor(3).after(next_cursor.unwrap()),
            &rules_by_id,
            |c: &Course| (KeyValue::from(c.id), KeyValue::from(c.title.as_str())),
        )
        .unwrap_err();
    assert!(err.is_client_error());
}
