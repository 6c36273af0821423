//! # Order Repository
//!
//! Database operations for placed orders.
//!
//! ## Append-Only
//! Orders are created by the checkout engine and never updated or deleted
//! here. Each order snapshots `total_amount_cents` and the chosen variant,
//! so it stays valid even if the product is later edited or removed.

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use velora_core::Order;

const ORDER_COLUMNS: &str = "id, user_id, product_id, payment_method, delivery_address, \
     customer_name, contact_number, total_amount_cents, size, color, \
     quantity, status, created_at, updated_at";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order.
    pub async fn insert(&self, order: &Order) -> DbResult<Order> {
        debug!(id = %order.id, user_id = %order.user_id, "Inserting order");

        sqlx::query(&insert_sql())
            .bind(&order.id)
            .bind(&order.user_id)
            .bind(&order.product_id)
            .bind(order.payment_method)
            .bind(&order.delivery_address)
            .bind(&order.customer_name)
            .bind(&order.contact_number)
            .bind(order.total_amount_cents)
            .bind(&order.size)
            .bind(&order.color)
            .bind(order.quantity)
            .bind(order.status)
            .bind(order.created_at)
            .bind(order.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(order.clone())
    }

    /// Transaction-scoped variant of [`OrderRepository::insert`].
    ///
    /// Used by the checkout commit phase so order rows roll back together
    /// with their stock decrements.
    pub async fn insert_tx(tx: &mut Transaction<'_, Sqlite>, order: &Order) -> DbResult<()> {
        sqlx::query(&insert_sql())
            .bind(&order.id)
            .bind(&order.user_id)
            .bind(&order.product_id)
            .bind(order.payment_method)
            .bind(&order.delivery_address)
            .bind(&order.customer_name)
            .bind(&order.contact_number)
            .bind(order.total_amount_cents)
            .bind(&order.size)
            .bind(&order.color)
            .bind(order.quantity)
            .bind(order.status)
            .bind(order.created_at)
            .bind(order.updated_at)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS);

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Lists a user's orders, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders WHERE user_id = ?1 ORDER BY created_at DESC",
            ORDER_COLUMNS
        );

        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Counts total orders (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn insert_sql() -> String {
    format!(
        "INSERT INTO orders ({}) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        ORDER_COLUMNS
    )
}

/// Helper to generate a new order ID.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use velora_core::{OrderStatus, PaymentMethod};

    fn test_order(user_id: &str, total_amount_cents: i64) -> Order {
        let now = Utc::now();
        Order {
            id: generate_order_id(),
            user_id: user_id.to_string(),
            product_id: "p1".to_string(),
            payment_method: PaymentMethod::Cod,
            delivery_address: "123 Mabini St, Manila".to_string(),
            customer_name: "Maria Santos".to_string(),
            contact_number: "09171234567".to_string(),
            total_amount_cents,
            size: "M".to_string(),
            color: "Black".to_string(),
            quantity: 2,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let db = test_db().await;
        let repo = db.orders();

        let order = test_order("u1", 100000);
        repo.insert(&order).await.unwrap();

        let fetched = repo.get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(fetched.user_id, "u1");
        assert_eq!(fetched.payment_method, PaymentMethod::Cod);
        assert_eq!(fetched.status, OrderStatus::Pending);
        assert_eq!(fetched.total_amount_cents, 100000);
        assert_eq!(fetched.quantity, 2);
    }

    #[tokio::test]
    async fn test_list_for_user_filters_by_owner() {
        let db = test_db().await;
        let repo = db.orders();

        repo.insert(&test_order("u1", 100)).await.unwrap();
        repo.insert(&test_order("u1", 200)).await.unwrap();
        repo.insert(&test_order("u2", 300)).await.unwrap();

        let orders = repo.list_for_user("u1").await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders.iter().all(|o| o.user_id == "u1"));

        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_insert_tx_rolls_back_with_transaction() {
        let db = test_db().await;
        let repo = db.orders();

        let order = test_order("u1", 100);
        let mut tx = db.begin().await.unwrap();
        OrderRepository::insert_tx(&mut tx, &order).await.unwrap();
        // Dropping the transaction without committing rolls it back
        drop(tx);

        assert!(repo.get_by_id(&order.id).await.unwrap().is_none());
    }
}
