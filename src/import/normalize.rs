// src/import/normalize.rs
//
// Total mappings from spreadsheet cell text onto the closed product
// enumerations. Unrecognized spellings fall back to a documented default
// instead of failing the row.

use crate::models::product::{MeasurementUnit, Presentation, ProductType, SaleUnit};

/// "NO_CORE" and its common misspellings map to NoCore; everything else,
/// including blank cells, is Core.
pub fn product_type(raw: &str) -> ProductType {
    match raw.trim().to_uppercase().as_str() {
        "NO_CORE" | "NO-CORE" | "NOCORE" => ProductType::NoCore,
        _ => ProductType::Core,
    }
}

/// "PESO" sells by weight; anything else sells by unit.
pub fn sale_unit(raw: &str) -> SaleUnit {
    match raw.trim().to_uppercase().as_str() {
        "PESO" => SaleUnit::Peso,
        _ => SaleUnit::Unidad,
    }
}

pub fn presentation(raw: &str) -> Presentation {
    match raw.trim().to_uppercase().as_str() {
        "VIDRIO" => Presentation::Vidrio,
        "PLANTA" => Presentation::Planta,
        _ => Presentation::Empaquetado,
    }
}

pub fn measurement_unit(raw: &str) -> MeasurementUnit {
    match raw.trim().to_uppercase().as_str() {
        "GR" => MeasurementUnit::Gr,
        "KG" => MeasurementUnit::Kg,
        "ML" => MeasurementUnit::Ml,
        _ => MeasurementUnit::Unidad,
    }
}
