// src/dtos/import.rs
use serde::Serialize;

use crate::import::pipeline::{ImportSummary, RowError};

/// Wire shape of one finished batch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDetails {
    pub total_products: u32,
    pub new_products: u32,
    pub updated_products: u32,
    pub new_brands: u32,
    pub new_categories: u32,
    pub errors: Vec<RowError>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ImportDetails>,
}

impl From<ImportSummary> for ImportDetails {
    fn from(summary: ImportSummary) -> Self {
        Self {
            total_products: summary.total_products,
            new_products: summary.new_products,
            updated_products: summary.updated_products,
            new_brands: summary.new_brands,
            new_categories: summary.new_categories,
            errors: summary.errors,
        }
    }
}

impl ImportResponse {
    pub fn completed(summary: ImportSummary) -> Self {
        Self {
            success: true,
            message: "Importación completada con éxito".to_string(),
            details: Some(summary.into()),
        }
    }
}
