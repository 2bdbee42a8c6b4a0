use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Environment variable holding the DSN of an external test database.
pub const ENV_TEST_DSN: &str = "PGARCHIVE_TEST_DSN";

/// Connect to the test database, or return None when no DSN is configured.
///
/// Tests that need a live database call this first and return early when it
/// yields None, so the suite passes on machines without PostgreSQL. The
/// `landing` and `archive` schemas are created on first use.
pub async fn test_pool() -> Option<PgPool> {
    let dsn = std::env::var(ENV_TEST_DSN).ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&dsn)
        .await
        .expect("Failed to connect to test database");

    // CREATE SCHEMA IF NOT EXISTS can still race under parallel tests;
    // serialize setup with an advisory lock held on one connection.
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    sqlx::query("SELECT pg_advisory_lock(727274)")
        .execute(&mut *conn)
        .await
        .expect("Failed to take setup lock");
    for schema in ["landing", "archive"] {
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
            .execute(&mut *conn)
            .await
            .expect("Failed to create test schema");
    }
    sqlx::query("SELECT pg_advisory_unlock(727274)")
        .execute(&mut *conn)
        .await
        .expect("Failed to release setup lock");
    drop(conn);

    Some(pool)
}

/// Create a fresh landing table and its matching archive table.
///
/// The landing table has columns `(id, amount, status)`; the archive table
/// has the same columns plus `archived_at`. Any leftovers from a previous
/// run are dropped first.
pub async fn create_table_pair(pool: &PgPool, table: &str) {
    let statements = [
        format!("DROP TABLE IF EXISTS landing.{}", table),
        format!("DROP TABLE IF EXISTS archive.archive_{}", table),
        format!(
            "CREATE TABLE landing.{} (id BIGINT PRIMARY KEY, amount BIGINT NOT NULL, status TEXT NOT NULL)",
            table
        ),
        format!(
            "CREATE TABLE archive.archive_{} (id BIGINT, amount BIGINT, status TEXT, archived_at TIMESTAMPTZ NOT NULL)",
            table
        ),
    ];
    for sql in &statements {
        sqlx::query(sql)
            .execute(pool)
            .await
            .expect("Failed to set up test tables");
    }
}

/// Seed `count` rows into a landing table.
pub async fn seed_rows(pool: &PgPool, table: &str, count: i64) {
    let sql = format!(
        "INSERT INTO landing.{} (id, amount, status) SELECT n, n * 10, 'new' FROM generate_series(1, $1) AS n",
        table
    );
    sqlx::query(&sql)
        .bind(count)
        .execute(pool)
        .await
        .expect("Failed to seed test rows");
}

/// Count rows in an archive table.
pub async fn archive_count(pool: &PgPool, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM archive.archive_{}", table);
    sqlx::query_scalar(&sql)
        .fetch_one(pool)
        .await
        .expect("Failed to count archived rows")
}

/// Drop a test table pair.
pub async fn drop_table_pair(pool: &PgPool, table: &str) {
    for sql in [
        format!("DROP TABLE IF EXISTS landing.{}", table),
        format!("DROP TABLE IF EXISTS archive.archive_{}", table),
    ] {
        sqlx::query(&sql)
            .execute(pool)
            .await
            .expect("Failed to drop test tables");
    }
}
