//! Paginated course listing over an in-memory SQLite database.
//!
//! Shows the full wiring of a listing call-site: a sort resolver and rule
//! set defined once, an executor that renders `PageQuery` into SQL, an
//! offset-mode page with totals, and a cursor walk over data with
//! duplicated timestamps.
//!
//! Run with: cargo run -p course-listing

use list_query::{
    CursorSigner, KeyValue, ListError, ListRules, PageInfo, PageQuery, PageRequest, PageRows,
    Paginator, QueryExecutor, Sqlite, SortDir, SortResolver,
};
use rusqlite::Connection;
use tracing::info;

#[derive(Debug, Clone)]
struct Course {
    id: i64,
    title: String,
    created_at: String,
}

struct CourseStore {
    conn: Connection,
}

impl CourseStore {
    fn seed() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "CREATE TABLE courses (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                created_at TEXT NOT NULL
            );",
        )?;
        let rows = [
            (1, "Rust Basics", "2024-01-01"),
            (2, "Advanced Rust", "2024-01-01"),
            (3, "SQL Deep Dive", "2024-01-02"),
            (4, "Indexing", "2024-01-02"),
            (5, "Query Planning", "2024-01-02"),
            (6, "HTTP APIs", "2024-01-03"),
            (7, "Streaming", "2024-01-04"),
            (8, "Observability", "2024-01-05"),
        ];
        for (id, title, created_at) in rows {
            conn.execute(
                "INSERT INTO courses (id, title, created_at) VALUES (?1, ?2, ?3)",
                (id, title, created_at),
            )?;
        }
        Ok(Self { conn })
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

impl QueryExecutor<Course> for CourseStore {
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

        info!(%sql, "executing");

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

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let store = CourseStore::seed()?;

    // Defined once at integration time, shared across requests
    let resolver = SortResolver::new()
        .map_field("id", "c.id")
        .map_field("title", "c.title")
        .map_field("createdAt", "c.created_at");
    let rules = ListRules::new()
        .allow_sorts(&["id", "title", "createdAt"])
        .default_sort("createdAt", SortDir::Desc)
        .default_sort("id", SortDir::Desc)
        .default_page_size(3)
        .max_page_size(50)
        .cursor_key("createdAt", "id");
    let signer = CursorSigner::insecure_dev();
    let paginator = Paginator::new(&resolver, &signer, &store);

    // Offset mode: jump-to-page with a total count
    println!("== offset mode: page 2, 3 per page ==");
    let page = paginator.paginate(PageRequest::offset(2, 3), &rules, course_key)?;
    for course in &page.items {
        println!("  #{:<2} {:<14} {}", course.id, course.title, course.created_at);
    }
    if let PageInfo::Offset {
        page, page_size, total,
    } = &page.page_info
    {
        println!("  (page {page}, {page_size} per page, {total} total)");
    }

    // Cursor mode: walk the whole set with signed continuation tokens
    println!("\n== cursor mode: newest first, 3 per page ==");
    let mut after: Option<String> = None;
    loop {
        let mut request = PageRequest::cursor(3);
        if let Some(token) = &after {
            request = request.after(token.clone());
        }
        let page = paginator.paginate(request, &rules, course_key)?;
        for course in &page.items {
            println!("  #{:<2} {:<14} {}", course.id, course.title, course.created_at);
        }
        let PageInfo::Cursor { next_cursor, .. } = page.page_info else {
            unreachable!("cursor requests return cursor page info");
        };
        match next_cursor {
            Some(token) => {
                println!("  -- next: {}...", &token[..24.min(token.len())]);
                after = Some(token);
            },
            None => break,
        }
    }

    // A tampered token is rejected, never silently reset to page one
    println!("\n== tampered cursor ==");
    let page = paginator.paginate(PageRequest::cursor(3), &rules, course_key)?;
    let PageInfo::Cursor {
        next_cursor: Some(mut token),
        ..
    } = page.page_info
    else {
        unreachable!("full first page mints a next cursor");
    };
    token.replace_range(0..1, "X");
    match paginator.paginate(PageRequest::cursor(3).after(token), &rules, course_key) {
        Err(err @ ListError::InvalidCursor(_)) => {
            println!("  rejected: {err} (client error: {})", err.is_client_error());
        },
        other => {
            println!("  unexpected outcome: {other:?}");
        },
    }

    Ok(())
}

fn course_key(course: &Course) -> (KeyValue, KeyValue) {
    (
        KeyValue::from(course.created_at.as_str()),
        KeyValue::from(course.id),
    )
}
