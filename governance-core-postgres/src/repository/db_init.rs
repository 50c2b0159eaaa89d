//! Database initialization and cleanup utilities
//!
//! Runs the SQL files of `migrations/` and `cleanup/` directly, outside of
//! `sqlx::migrate!`, for tooling that provisions or tears down a governance schema.

use sqlx::PgPool;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Initialize the database by executing migration files in ascending order
///
/// # Example
///
/// ```rust,no_run
/// use sqlx::PgPool;
/// use governance_core_postgres::repository::db_init::init_database;
///
/// # async fn example(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// init_database(pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn init_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    execute_sql_files_in_order(pool, &migrations_dir, true).await
}

/// Drop every governance table, type and trigger function, in descending file order
///
/// # Example
///
/// ```rust,no_run
/// use sqlx::PgPool;
/// use governance_core_postgres::repository::db_init::cleanup_database;
///
/// # async fn example(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// cleanup_database(pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn cleanup_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let cleanup_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("cleanup");
    execute_sql_files_in_order(pool, &cleanup_dir, false).await
}

async fn execute_sql_files_in_order(
    pool: &PgPool,
    dir: &Path,
    ascending: bool,
) -> Result<(), sqlx::Error> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .map_err(sqlx::Error::Io)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("sql"))
        .collect();

    entries.sort_by(|a, b| {
        let ordering = a.file_name().cmp(&b.file_name());
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });

    for entry in entries {
        let path = entry.path();
        let sql = fs::read_to_string(&path).map_err(sqlx::Error::Io)?;
        debug!(file = %path.display(), "executing sql file");
        sqlx::raw_sql(&sql).execute(pool).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use sqlx::Row;

    async fn table_exists(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT to_regclass($1) IS NOT NULL AS present")
            .bind(name)
            .fetch_one(pool)
            .await?;
        row.try_get("present")
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    #[serial]
    async fn test_init_and_cleanup() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let database_url = std::env::var("DATABASE_URL")?;
        let pool = PgPool::connect(&database_url).await?;

        cleanup_database(&pool).await?;
        assert!(!table_exists(&pool, "approval_request").await?);

        init_database(&pool).await?;
        for table in ["workflow", "approval_request", "user_request", "task", "activity_log", "role_grant"] {
            assert!(table_exists(&pool, table).await?, "{table} missing");
        }

        cleanup_database(&pool).await?;
        assert!(!table_exists(&pool, "activity_log").await?);

        sqlx::migrate!().run(&pool).await?;
        Ok(())
    }
}
