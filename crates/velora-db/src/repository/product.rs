//! # Product Repository
//!
//! Database operations for the product catalog and its stock counters.
//!
//! ## Key Operations
//! - Catalog queries: substring search, brand/category filters, pagination
//! - CRUD for admin screens (full-overwrite updates)
//! - Guarded stock decrements
//!
//! ## Guarded Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Decrement Strategy                             │
//! │                                                                         │
//! │  ❌ WRONG: read stock, subtract, write back                            │
//! │     Two concurrent checkouts can both read stock=1 and both write 0,   │
//! │     or worse, drive the counter negative.                               │
//! │                                                                         │
//! │  ✅ CORRECT: conditional update                                        │
//! │     UPDATE products SET stock = stock - ?2                              │
//! │     WHERE id = ?1 AND stock >= ?2                                       │
//! │                                                                         │
//! │  rows_affected == 0 means the guard failed: the caller aborts and      │
//! │  reports insufficient stock. The counter can never go below zero.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use velora_core::Product;

/// Default page size for catalog listings.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

const PRODUCT_COLUMNS: &str = "id, name, brand, category, description, price_cents, \
     image_url, size, color, stock, created_at, updated_at";

/// Outcome of a guarded stock decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDecrement {
    /// Stock was decremented by the requested quantity.
    Applied,
    /// The `stock >= quantity` guard failed; nothing was changed.
    Insufficient { available: i64 },
}

/// Catalog browse filter: substring search plus exact brand/category match,
/// with limit/offset pagination.
#[derive(Debug, Clone)]
pub struct ProductFilter {
    /// Substring matched against name, description, brand and category.
    pub search: Option<String>,
    /// Exact brand match.
    pub brand: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for ProductFilter {
    fn default() -> Self {
        ProductFilter {
            search: None,
            brand: None,
            category: None,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Searches products by substring across name, description, brand and
    /// category.
    ///
    /// An empty query returns the newest products unfiltered.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        let pattern = if query.is_empty() {
            None
        } else {
            Some(format!("%{}%", query))
        };

        let sql = format!(
            "SELECT {} FROM products \
             WHERE (?1 IS NULL OR name LIKE ?1 OR description LIKE ?1 \
                    OR brand LIKE ?1 OR category LIKE ?1) \
             ORDER BY created_at DESC \
             LIMIT ?2",
            PRODUCT_COLUMNS
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists products matching a catalog filter, newest first.
    ///
    /// Search, brand and category compose; absent criteria don't constrain.
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        let pattern = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let sql = format!(
            "SELECT {} FROM products \
             WHERE (?1 IS NULL OR name LIKE ?1 OR description LIKE ?1 \
                    OR brand LIKE ?1 OR category LIKE ?1) \
               AND (?2 IS NULL OR brand = ?2) \
               AND (?3 IS NULL OR category = ?3) \
             ORDER BY created_at DESC \
             LIMIT ?4 OFFSET ?5",
            PRODUCT_COLUMNS
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(pattern)
            .bind(filter.brand.as_deref())
            .bind(filter.category.as_deref())
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Lists products of one brand, newest first.
    pub async fn filter_by_brand(&self, brand: &str, limit: u32) -> DbResult<Vec<Product>> {
        self.list(&ProductFilter {
            brand: Some(brand.to_string()),
            limit,
            ..Default::default()
        })
        .await
    }

    /// Lists products of one category, newest first.
    pub async fn filter_by_category(&self, category: &str, limit: u32) -> DbResult<Vec<Product>> {
        self.list(&ProductFilter {
            category: Some(category.to_string()),
            limit,
            ..Default::default()
        })
        .await
    }

    /// Lists all distinct brands, sorted. Feeds the catalog filter dropdown.
    pub async fn list_brands(&self) -> DbResult<Vec<String>> {
        let brands: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT brand FROM products ORDER BY brand")
                .fetch_all(&self.pool)
                .await?;

        Ok(brands)
    }

    /// Lists all distinct categories, sorted.
    pub async fn list_categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM products ORDER BY category")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    /// Inserts a new product.
    ///
    /// ## Arguments
    /// * `product` - Product to insert (id generated beforehand)
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            "INSERT INTO products ( \
                id, name, brand, category, description, price_cents, \
                image_url, size, color, stock, created_at, updated_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.image_url)
        .bind(&product.size)
        .bind(&product.color)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Updates an existing product (admin full overwrite, stock included).
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET \
                name = ?2, brand = ?3, category = ?4, description = ?5, \
                price_cents = ?6, image_url = ?7, size = ?8, color = ?9, \
                stock = ?10, updated_at = ?11 \
             WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.image_url)
        .bind(&product.size)
        .bind(&product.color)
        .bind(product.stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Orders keep their denormalized snapshot, so history stays intact.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Decrements stock with a `stock >= quantity` guard.
    ///
    /// ## Returns
    /// * `Ok(StockDecrement::Applied)` - Stock was decremented
    /// * `Ok(StockDecrement::Insufficient)` - Guard failed, nothing changed
    /// * `Err(DbError::NotFound)` - No such product
    pub async fn decrement_stock(&self, id: &str, quantity: i64) -> DbResult<StockDecrement> {
        debug!(id = %id, quantity = %quantity, "Decrementing stock");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET stock = stock - ?2, updated_at = ?3 \
             WHERE id = ?1 AND stock >= ?2",
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Guard failed or product gone; a follow-up read tells which.
            return match self.get_by_id(id).await? {
                None => Err(DbError::not_found("Product", id)),
                Some(p) => Ok(StockDecrement::Insufficient { available: p.stock }),
            };
        }

        Ok(StockDecrement::Applied)
    }

    /// Transaction-scoped variant of [`ProductRepository::decrement_stock`].
    ///
    /// Used by the checkout commit phase: a failed guard aborts the whole
    /// transaction, rolling back any sibling order inserts and decrements.
    pub async fn decrement_stock_tx(
        tx: &mut Transaction<'_, Sqlite>,
        id: &str,
        quantity: i64,
    ) -> DbResult<StockDecrement> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET stock = stock - ?2, updated_at = ?3 \
             WHERE id = ?1 AND stock >= ?2",
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            let available: Option<i64> =
                sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                    .bind(id)
                    .fetch_optional(&mut **tx)
                    .await?;

            return match available {
                None => Err(DbError::not_found("Product", id)),
                Some(available) => Ok(StockDecrement::Insufficient { available }),
            };
        }

        Ok(StockDecrement::Applied)
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn test_product(name: &str, brand: &str, category: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            name: name.to_string(),
            brand: brand.to_string(),
            category: category.to_string(),
            description: Some(format!("{} by {}", name, brand)),
            price_cents,
            image_url: None,
            size: Some("M".to_string()),
            color: Some("Black".to_string()),
            stock,
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
        let repo = db.products();

        let product = test_product("Denim Jacket", "Levi's", "jacket", 50000, 5);
        repo.insert(&product).await.unwrap();

        let fetched = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Denim Jacket");
        assert_eq!(fetched.price_cents, 50000);
        assert_eq!(fetched.stock, 5);
        assert_eq!(fetched.description.as_deref(), Some("Denim Jacket by Levi's"));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = test_db().await;
        assert!(db.products().get_by_id("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_matches_substring_across_fields() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&test_product("Denim Jacket", "Levi's", "jacket", 50000, 5))
            .await
            .unwrap();
        repo.insert(&test_product("Summer Dress", "Zara", "dress", 30000, 3))
            .await
            .unwrap();

        // Matches name
        let hits = repo.search("denim", 20).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Denim Jacket");

        // Matches brand
        let hits = repo.search("zara", 20).await.unwrap();
        assert_eq!(hits.len(), 1);

        // Empty query returns everything
        let hits = repo.search("", 20).await.unwrap();
        assert_eq!(hits.len(), 2);

        // No match
        let hits = repo.search("sneaker", 20).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_list_composes_filters() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&test_product("Denim Jacket", "Levi's", "jacket", 50000, 5))
            .await
            .unwrap();
        repo.insert(&test_product("Denim Pants", "Levi's", "pants", 40000, 5))
            .await
            .unwrap();
        repo.insert(&test_product("Summer Dress", "Zara", "dress", 30000, 3))
            .await
            .unwrap();

        assert_eq!(repo.filter_by_brand("Levi's", 20).await.unwrap().len(), 2);
        assert_eq!(repo.filter_by_category("dress", 20).await.unwrap().len(), 1);

        let filter = ProductFilter {
            search: Some("denim".to_string()),
            category: Some("pants".to_string()),
            ..Default::default()
        };
        let hits = repo.list(&filter).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Denim Pants");
    }

    #[tokio::test]
    async fn test_brand_and_category_dropdowns() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&test_product("A", "Zara", "dress", 100, 1)).await.unwrap();
        repo.insert(&test_product("B", "Levi's", "jacket", 100, 1)).await.unwrap();
        repo.insert(&test_product("C", "Levi's", "pants", 100, 1)).await.unwrap();

        assert_eq!(repo.list_brands().await.unwrap(), vec!["Levi's", "Zara"]);
        assert_eq!(
            repo.list_categories().await.unwrap(),
            vec!["dress", "jacket", "pants"]
        );
    }

    #[tokio::test]
    async fn test_update_is_full_overwrite() {
        let db = test_db().await;
        let repo = db.products();

        let mut product = test_product("Denim Jacket", "Levi's", "jacket", 50000, 5);
        repo.insert(&product).await.unwrap();

        product.name = "Denim Jacket II".to_string();
        product.price_cents = 55000;
        product.stock = 8;
        repo.update(&product).await.unwrap();

        let fetched = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Denim Jacket II");
        assert_eq!(fetched.price_cents, 55000);
        assert_eq!(fetched.stock, 8);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let db = test_db().await;
        let product = test_product("Ghost", "Nobody", "void", 100, 0);

        let err = db.products().update(&product).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_decrement_stock_applied() {
        let db = test_db().await;
        let repo = db.products();

        let product = test_product("Denim Jacket", "Levi's", "jacket", 50000, 5);
        repo.insert(&product).await.unwrap();

        let outcome = repo.decrement_stock(&product.id, 2).await.unwrap();
        assert_eq!(outcome, StockDecrement::Applied);

        let fetched = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.stock, 3);
    }

    #[tokio::test]
    async fn test_decrement_stock_guard_refuses_overdraw() {
        let db = test_db().await;
        let repo = db.products();

        let product = test_product("Denim Jacket", "Levi's", "jacket", 50000, 2);
        repo.insert(&product).await.unwrap();

        let outcome = repo.decrement_stock(&product.id, 3).await.unwrap();
        assert_eq!(outcome, StockDecrement::Insufficient { available: 2 });

        // Nothing changed
        let fetched = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.stock, 2);
    }

    #[tokio::test]
    async fn test_decrement_stock_missing_product() {
        let db = test_db().await;
        let err = db.products().decrement_stock("ghost", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_removes_product() {
        let db = test_db().await;
        let repo = db.products();

        let product = test_product("Denim Jacket", "Levi's", "jacket", 50000, 5);
        repo.insert(&product).await.unwrap();

        repo.delete(&product.id).await.unwrap();
        assert!(repo.get_by_id(&product.id).await.unwrap().is_none());

        let err = repo.delete(&product.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
