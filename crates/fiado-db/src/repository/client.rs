//! # Client Repository
//!
//! Lookups and inserts for registered buyers. Full client management is a
//! plain CRUD surface outside this crate; the ledger engine only needs to
//! resolve ids and recognize the reserved walk-in client (seeded by the
//! initial migration, never edited).

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use fiado_core::Client;

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Gets a client by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        Self::fetch(&self.pool, id).await
    }

    /// Gets a client by ID on any executor (pool or open transaction).
    pub async fn fetch<'e, E>(executor: E, id: &str) -> DbResult<Option<Client>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, phone, email, address, is_active,
                   created_at, updated_at
            FROM clients
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(client)
    }

    /// Inserts a new client.
    pub async fn insert(&self, client: &Client) -> DbResult<()> {
        debug!(id = %client.id, name = %client.name, "Inserting client");

        sqlx::query(
            r#"
            INSERT INTO clients (
                id, name, phone, email, address, is_active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.address)
        .bind(client.is_active)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts active clients (for diagnostics and the seeder).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new client ID.
pub fn generate_client_id() -> String {
    Uuid::new_v4().to_string()
}
