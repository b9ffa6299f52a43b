use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};

/// CORE products carry the house margin; everything else is NO_CORE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "product_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    Core,
    NoCore,
}

/// How the product is sold: by weight (PESO) or by piece (UNIDAD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sale_unit", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleUnit {
    Peso,
    Unidad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "presentation", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Presentation {
    Vidrio,
    Planta,
    Empaquetado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "measurement_unit", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasurementUnit {
    Gr,
    Kg,
    Ml,
    Unidad,
}

#[derive(Debug, Clone, FromRow)]
pub struct Product {
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
    pub brand_id: i64,
    pub category_id: i64,
    pub created_by: i64,
    pub created_at: Option<DateTime<Utc>>,
}
