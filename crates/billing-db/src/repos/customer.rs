//! Customer repository

use sqlx::PgPool;

use crate::{DbCustomer, DbError, DbResult};

/// Customer repository for account lifecycle management
pub struct CustomerRepo {
    pool: PgPool,
}

impl CustomerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new customer together with its zero-balance wallet.
    ///
    /// Both rows are inserted in one transaction: a non-deleted customer
    /// always has exactly one wallet.
    pub async fn create(&self, name: &str) -> DbResult<DbCustomer> {
        if name.trim().is_empty() {
            return Err(DbError::InvalidInput("Customer name must not be empty".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let customer = sqlx::query_as::<_, DbCustomer>(
            r#"
            INSERT INTO customers (name)
            VALUES ($1)
            RETURNING id, name, deleted, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO wallets (customer_id, amount) VALUES ($1, 0)")
            .bind(customer.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(customer)
    }

    /// Find customer by ID, excluding soft-deleted rows
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<DbCustomer>> {
        let customer = sqlx::query_as::<_, DbCustomer>(
            r#"
            SELECT id, name, deleted, created_at, updated_at
            FROM customers
            WHERE id = $1 AND deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Rename a non-deleted customer
    pub async fn rename(&self, id: i64, name: &str) -> DbResult<DbCustomer> {
        if name.trim().is_empty() {
            return Err(DbError::InvalidInput("Customer name must not be empty".to_string()));
        }

        let customer = sqlx::query_as::<_, DbCustomer>(
            r#"
            UPDATE customers
            SET name = $2, updated_at = NOW()
            WHERE id = $1 AND deleted = FALSE
            RETURNING id, name, deleted, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("Customer {} not found", id)))?;

        Ok(customer)
    }

    /// Soft-delete a customer.
    ///
    /// The row, its wallet and its operation history are retained but
    /// become invisible to lookups and to the transaction engine.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE customers SET deleted = TRUE, updated_at = NOW() WHERE id = $1 AND deleted = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("Customer {} not found", id)));
        }

        Ok(())
    }

    /// Hard-delete a customer; the foreign-key cascade removes its wallet
    /// and every journal row the wallet owns.
    pub async fn purge(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("Customer {} not found", id)));
        }

        Ok(())
    }
}
