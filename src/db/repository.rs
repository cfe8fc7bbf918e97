//! Repository for the persisted cart identifier.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;

/// Read/write access to the single persisted cart identifier.
///
/// Written when a cart is created, cleared when the remote cart is deemed
/// unrecoverable; no other code path touches it.
#[derive(Clone)]
pub struct CartIdRepository {
    pool: SqlitePool,
}

impl CartIdRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the last-known cart identifier.
    pub async fn get(&self) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT cart_id FROM cart_session WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("cart_id"))
    }

    /// Store a new cart identifier.
    pub async fn set(&self, cart_id: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE cart_session SET cart_id = ?, updated_at = ? WHERE id = 1")
            .bind(cart_id)
            .bind(&now)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Forget the cart identifier.
    pub async fn clear(&self) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE cart_session SET cart_id = NULL, updated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
