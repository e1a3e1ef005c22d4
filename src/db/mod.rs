mod error;
mod filter;
mod schema;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

use crate::config::Config;
use crate::models::{Client, ClientUpdate, NewClient, Phone};

pub use error::{ConstraintKind, DbError, DbResult};
pub use filter::{find_clients_query, ClientFilter, Predicate};

/// Handle to the contact database
///
/// The pool is capped at one connection, so every operation runs on the
/// same session and none of them overlap.
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect using the configured database URL
    pub async fn new(config: &Config) -> Result<Self> {
        let db = Self::connect(config.database_url()?).await?;
        Ok(db)
    }

    /// Connect to the database at `url`
    pub async fn connect(url: &str) -> DbResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;

        Ok(Self { pool })
    }

    /// Close the connection, waiting for it to be released
    pub async fn close(self) {
        self.pool.close().await;
    }

    // Schema operations
    pub async fn ensure_schema(&self) -> DbResult<()> {
        schema::ensure(&self.pool).await?;
        info!("schema ready");
        Ok(())
    }

    /// Drop all clients and phones and recreate empty tables
    pub async fn reset_schema(&self) -> DbResult<()> {
        schema::reset(&self.pool).await?;
        info!("schema reset");
        Ok(())
    }

    // Client operations

    /// Insert a client and its phones, returning the new client id.
    ///
    /// Runs in one transaction: if any insert fails nothing is kept.
    pub async fn create_client(&self, client: &NewClient) -> DbResult<i32> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO clients (first_name, last_name, email)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.email)
        .fetch_one(&mut *tx)
        .await?;

        for phone in &client.phones {
            sqlx::query("INSERT INTO phones (client_id, phone) VALUES ($1, $2)")
                .bind(id)
                .bind(phone)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(client_id = id, phones = client.phones.len(), "created client");
        Ok(id)
    }

    pub async fn add_phone(&self, client_id: i32, phone: &str) -> DbResult<()> {
        sqlx::query("INSERT INTO phones (client_id, phone) VALUES ($1, $2)")
            .bind(client_id)
            .bind(phone)
            .execute(&self.pool)
            .await?;

        info!(client_id, phone, "added phone");
        Ok(())
    }

    /// Overwrite the supplied fields of a client. Unknown ids are ignored.
    pub async fn update_client(&self, client_id: i32, update: &ClientUpdate) -> DbResult<()> {
        let Some(mut query) = update_client_query(client_id, update) else {
            debug!(client_id, "no fields to update");
            return Ok(());
        };

        let result = query.build().execute(&self.pool).await?;

        debug!(client_id, rows = result.rows_affected(), "updated client");
        Ok(())
    }

    pub async fn delete_phone(&self, client_id: i32, phone: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM phones WHERE client_id = $1 AND phone = $2")
            .bind(client_id)
            .bind(phone)
            .execute(&self.pool)
            .await?;

        debug!(client_id, phone, rows = result.rows_affected(), "deleted phone");
        Ok(())
    }

    /// Delete a client; its phones go with it through the cascade.
    pub async fn delete_client(&self, client_id: i32) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(client_id)
            .execute(&self.pool)
            .await?;

        debug!(client_id, rows = result.rows_affected(), "deleted client");
        Ok(())
    }

    /// Clients matching every supplied criterion, each with all of its phones
    pub async fn find_clients(&self, filter: &ClientFilter) -> DbResult<Vec<Client>> {
        let mut query = find_clients_query(filter);
        let clients = query
            .build_query_as::<Client>()
            .fetch_all(&self.pool)
            .await?;

        debug!(matched = clients.len(), "found clients");
        Ok(clients)
    }

    // Phone operations
    pub async fn list_phones(&self, client_id: i32) -> DbResult<Vec<Phone>> {
        let phones = sqlx::query_as::<_, Phone>(
            "SELECT id, client_id, phone FROM phones WHERE client_id = $1 ORDER BY id ASC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(phones)
    }
}

/// One UPDATE covering the supplied fields, or `None` when there are none
fn update_client_query(client_id: i32, update: &ClientUpdate) -> Option<QueryBuilder<'static, Postgres>> {
    if update.is_empty() {
        return None;
    }

    let fields = [
        ("first_name = ", &update.first_name),
        ("last_name = ", &update.last_name),
        ("email = ", &update.email),
    ];

    let mut query = QueryBuilder::new("UPDATE clients SET ");
    {
        let mut assignments = query.separated(", ");
        for (column, value) in fields {
            if let Some(value) = value {
                assignments.push(column);
                assignments.push_bind_unseparated(value.clone());
            }
        }
    }

    query.push(" WHERE id = ");
    query.push_bind(client_id);
    Some(query)
}

/// Initialize the database connection and make sure the tables exist
pub async fn init(config: &Config) -> Result<Database> {
    let db = Database::new(config).await?;
    db.ensure_schema().await?;

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_builds_nothing() {
        assert!(update_client_query(1, &ClientUpdate::default()).is_none());
    }

    #[test]
    fn update_sets_only_supplied_fields() {
        let update = ClientUpdate {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };
        let query = update_client_query(7, &update).unwrap();

        assert_eq!(query.sql(), "UPDATE clients SET email = $1 WHERE id = $2");
    }

    #[test]
    fn update_lists_fields_in_column_order() {
        let update = ClientUpdate {
            first_name: Some("Alena".to_string()),
            last_name: Some("Ivanova".to_string()),
            email: Some("alena@example.com".to_string()),
        };
        let query = update_client_query(1, &update).unwrap();

        assert_eq!(
            query.sql(),
            "UPDATE clients SET first_name = $1, last_name = $2, email = $3 WHERE id = $4"
        );
    }
}
