//! # Catalog Service
//!
//! Browse operations for customers and permission-gated mutations for
//! admins. Checkout never goes through here; it reads price/stock straight
//! from the repository.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use velora_core::validation::{
    validate_price_cents, validate_product_name, validate_search_query, validate_stock,
};
use velora_core::{Action, CoreError, Permission, PermissionSet, Product, Resource};
use velora_db::repository::product::generate_product_id;
use velora_db::{Database, ProductFilter};

/// Distinct brand/category values for the catalog filter dropdowns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFilters {
    pub brands: Vec<String>,
    pub categories: Vec<String>,
}

/// Input for creating a catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub stock: i64,
}

/// Catalog browse and admin operations.
#[derive(Debug, Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    /// Creates a catalog service.
    pub fn new(db: Database) -> Self {
        CatalogService { db }
    }

    /// Searches products by substring across name, description, brand and
    /// category.
    pub async fn search(&self, query: &str, limit: u32) -> StoreResult<Vec<Product>> {
        let query = validate_search_query(query).map_err(CoreError::Validation)?;
        Ok(self.db.products().search(&query, limit).await?)
    }

    /// Lists products matching a browse filter (search + brand + category,
    /// paginated).
    pub async fn browse(&self, filter: &ProductFilter) -> StoreResult<Vec<Product>> {
        if let Some(search) = &filter.search {
            validate_search_query(search).map_err(CoreError::Validation)?;
        }
        Ok(self.db.products().list(filter).await?)
    }

    /// Returns the distinct brand/category values for filter dropdowns.
    pub async fn filters(&self) -> StoreResult<CatalogFilters> {
        Ok(CatalogFilters {
            brands: self.db.products().list_brands().await?,
            categories: self.db.products().list_categories().await?,
        })
    }

    /// Gets a single product for the product page.
    pub async fn get(&self, product_id: &str) -> StoreResult<Product> {
        self.db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()).into())
    }

    // =========================================================================
    // Admin Mutations
    // =========================================================================

    /// Creates a product. Requires `Create Products`.
    pub async fn create_product(
        &self,
        acting: &PermissionSet,
        input: NewProduct,
    ) -> StoreResult<Product> {
        self.require(acting, Action::Create)?;

        validate_product_name(&input.name)?;
        validate_price_cents(input.price_cents)?;
        validate_stock(input.stock)?;

        let now = chrono::Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: input.name,
            brand: input.brand,
            category: input.category,
            description: input.description,
            price_cents: input.price_cents,
            image_url: input.image_url,
            size: input.size,
            color: input.color,
            stock: input.stock,
            created_at: now,
            updated_at: now,
        };

        let created = self.db.products().insert(&product).await?;
        info!(id = %created.id, name = %created.name, "Product created");
        Ok(created)
    }

    /// Overwrites a product wholesale, stock included. Requires
    /// `Edit Products`.
    pub async fn update_product(
        &self,
        acting: &PermissionSet,
        product: &Product,
    ) -> StoreResult<()> {
        self.require(acting, Action::Edit)?;

        validate_product_name(&product.name)?;
        validate_price_cents(product.price_cents)?;
        validate_stock(product.stock)?;

        self.db.products().update(product).await?;
        info!(id = %product.id, "Product updated");
        Ok(())
    }

    /// Deletes a product. Requires `Delete Products`. Existing orders keep
    /// their snapshots.
    pub async fn delete_product(&self, acting: &PermissionSet, product_id: &str) -> StoreResult<()> {
        self.require(acting, Action::Delete)?;

        self.db.products().delete(product_id).await?;
        info!(id = %product_id, "Product deleted");
        Ok(())
    }

    /// Capability check against the acting user's grants.
    fn require(&self, acting: &PermissionSet, action: Action) -> StoreResult<()> {
        let permission = Permission::new(action, Resource::Products);
        if acting.allows(permission) {
            Ok(())
        } else {
            debug!(%permission, "permission denied");
            Err(StoreError::PermissionDenied { permission })
        }
    }
}
