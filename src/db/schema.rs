use sqlx::PgPool;

use super::error::DbResult;

pub(crate) const CREATE_CLIENTS: &str = r#"
CREATE TABLE IF NOT EXISTS clients (
    id SERIAL PRIMARY KEY,
    first_name VARCHAR(50) NOT NULL,
    last_name VARCHAR(50) NOT NULL,
    email VARCHAR(100) UNIQUE NOT NULL
)
"#;

pub(crate) const CREATE_PHONES: &str = r#"
CREATE TABLE IF NOT EXISTS phones (
    id SERIAL PRIMARY KEY,
    client_id INTEGER REFERENCES clients(id) ON DELETE CASCADE,
    phone VARCHAR(20)
)
"#;

const DROP_TABLES: &str = "DROP TABLE IF EXISTS phones, clients";

/// Create both tables unless they already exist
pub async fn ensure(pool: &PgPool) -> DbResult<()> {
    let mut tx = pool.begin().await?;

    // phones references clients, so clients goes first
    sqlx::query(CREATE_CLIENTS).execute(&mut *tx).await?;
    sqlx::query(CREATE_PHONES).execute(&mut *tx).await?;

    tx.commit().await?;
    Ok(())
}

/// Drop both tables with their data and create them again
pub async fn reset(pool: &PgPool) -> DbResult<()> {
    sqlx::query(DROP_TABLES).execute(pool).await?;
    ensure(pool).await
}
