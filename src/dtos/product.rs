// src/dtos/product.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};

use crate::models::product::{MeasurementUnit, Presentation, ProductType, SaleUnit};

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub sku: String,
    pub name: String,
    pub price: f64,
    pub product_type: ProductType,
    pub sale_unit: SaleUnit,
    pub presentation: Presentation,
    pub measurement_unit: MeasurementUnit,
    pub content_amount: Option<f64>,
    pub stock: i32,
    pub commission_margin: f64,
    pub brand_id: i64,
    pub category_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub product_type: Option<ProductType>,
    pub sale_unit: Option<SaleUnit>,
    pub presentation: Option<Presentation>,
    pub measurement_unit: Option<MeasurementUnit>,
    pub content_amount: Option<f64>,
    pub stock: Option<i32>,
    pub commission_margin: Option<f64>,
    pub brand_id: Option<i64>,
    pub category_id: Option<i64>,
}

/// List/detail row with the brand and category names joined in.
#[derive(Debug, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub price: f64,
    pub product_type: ProductType,
    pub sale_unit: SaleUnit,
    pub presentation: Presentation,
    pub measurement_unit: MeasurementUnit,
    pub content_amount: Option<f64>,
    pub stock: i32,
    pub commission_margin: f64,
    pub brand: String,
    pub category: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub price: f64,
    pub product_type: ProductType,
    pub sale_unit: SaleUnit,
    pub presentation: Presentation,
    pub measurement_unit: MeasurementUnit,
    pub content_amount: Option<f64>,
    pub stock: i32,
    pub commission_margin: f64,
    pub brand: String,
    pub category: String,
    pub created_at: Option<String>,
}

impl From<ProductRow> for ProductResponse {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            sku: row.sku,
            name: row.name,
            price: row.price,
            product_type: row.product_type,
            sale_unit: row.sale_unit,
            presentation: row.presentation,
            measurement_unit: row.measurement_unit,
            content_amount: row.content_amount,
            stock: row.stock,
            commission_margin: row.commission_margin,
            brand: row.brand,
            category: row.category,
            created_at: row.created_at.map(|dt| dt.to_rfc3339()),
        }
    }
}
