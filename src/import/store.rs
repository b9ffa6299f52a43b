// src/import/store.rs
//
// Persistence seam for the import pipeline. The trait mirrors exactly the
// operations the pipeline needs, so tests can run against an in-memory
// double and production against Postgres.

use std::fmt;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::import::validate::ProductData;
use crate::models::brand::Brand;
use crate::models::category::Category;
use crate::models::product::Product;

#[derive(Debug)]
pub struct StoreError(String);

impl StoreError {
    pub fn new(msg: impl Into<String>) -> Self {
        StoreError(msg.into())
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError(err.to_string())
    }
}

/// Create payload: the normalized row plus the resolved references.
#[derive(Debug)]
pub struct NewProduct<'a> {
    pub data: &'a ProductData,
    pub brand_id: i64,
    pub category_id: i64,
    pub created_by: i64,
}

/// Update payload. `stock` is the already-resolved final value; the stock
/// policy is applied by the pipeline, not the store.
#[derive(Debug)]
pub struct ProductUpdate<'a> {
    pub data: &'a ProductData,
    pub brand_id: i64,
    pub category_id: i64,
    pub stock: i32,
}

#[async_trait]
pub trait ImportStore {
    async fn find_product_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError>;
    async fn create_product(&self, new: NewProduct<'_>) -> Result<(), StoreError>;
    async fn update_product(&self, id: i64, update: ProductUpdate<'_>) -> Result<(), StoreError>;
    async fn find_brand_by_name(&self, name: &str) -> Result<Option<Brand>, StoreError>;
    async fn create_brand(&self, name: &str) -> Result<Brand, StoreError>;
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, StoreError>;
    async fn create_category(&self, name: &str) -> Result<Category, StoreError>;
}

pub struct PgStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgStore<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

const PRODUCT_COLUMNS: &str = "id, sku, name,
        price::FLOAT8 AS price,
        product_type, sale_unit, presentation, measurement_unit,
        content_amount::FLOAT8 AS content_amount,
        stock,
        commission_margin::FLOAT8 AS commission_margin,
        brand_id, category_id, created_by, created_at";

#[async_trait]
impl ImportStore for PgStore<'_> {
    async fn find_product_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = $1"
        ))
        .bind(sku)
        .fetch_optional(self.pool)
        .await?;
        Ok(product)
    }

    async fn create_product(&self, new: NewProduct<'_>) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO products
                (sku, name, price, product_type, sale_unit, presentation,
                 measurement_unit, content_amount, stock, commission_margin,
                 brand_id, category_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(&new.data.sku)
        .bind(&new.data.name)
        .bind(new.data.price)
        .bind(new.data.product_type)
        .bind(new.data.sale_unit)
        .bind(new.data.presentation)
        .bind(new.data.measurement_unit)
        .bind(new.data.content_amount)
        .bind(new.data.stock)
        .bind(new.data.commission_margin)
        .bind(new.brand_id)
        .bind(new.category_id)
        .bind(new.created_by)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    async fn update_product(&self, id: i64, update: ProductUpdate<'_>) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE products SET
                name = $1, price = $2, product_type = $3, sale_unit = $4,
                presentation = $5, measurement_unit = $6, content_amount = $7,
                stock = $8, commission_margin = $9, brand_id = $10, category_id = $11
             WHERE id = $12",
        )
        .bind(&update.data.name)
        .bind(update.data.price)
        .bind(update.data.product_type)
        .bind(update.data.sale_unit)
        .bind(update.data.presentation)
        .bind(update.data.measurement_unit)
        .bind(update.data.content_amount)
        .bind(update.stock)
        .bind(update.data.commission_margin)
        .bind(update.brand_id)
        .bind(update.category_id)
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    async fn find_brand_by_name(&self, name: &str) -> Result<Option<Brand>, StoreError> {
        let brand = sqlx::query_as::<_, Brand>(
            "SELECT id, name, created_at FROM brands WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;
        Ok(brand)
    }

    // ON CONFLICT keeps concurrent imports from failing on a duplicate name.
    async fn create_brand(&self, name: &str) -> Result<Brand, StoreError> {
        let brand = sqlx::query_as::<_, Brand>(
            "INSERT INTO brands (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(self.pool)
        .await?;
        Ok(brand)
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, StoreError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;
        Ok(category)
    }

    async fn create_category(&self, name: &str) -> Result<Category, StoreError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(self.pool)
        .await?;
        Ok(category)
    }
}
