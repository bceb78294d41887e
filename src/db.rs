//! Database module
//!
//! Database connection and schema verification utilities.

use sqlx::PgPool;

/// Note: schema is managed with raw SQL files in the migrations/ directory
/// and applied externally (psql or sqlx-cli). This function can be used to
/// verify database connectivity.
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Simple connectivity check
    sqlx::query("SELECT 1")
        .execute(pool)
        .await?;

    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let required_tables = vec![
        "users",
        "accounts",
        "sessions",
        "cards",
    ];

    for table in required_tables {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!(
                "Required table '{}' does not exist. Please apply migrations/0001_init.sql.",
                table
            );
            return Ok(false);
        }
    }

    Ok(true)
}
