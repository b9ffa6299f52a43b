// src/import/sku.rs

use rand::Rng;

use crate::models::product::{MeasurementUnit, Presentation, ProductType};

/// Derives a SKU for rows imported without one. The prefix encodes
/// category/brand/name plus the packaging attributes; a random numeric
/// suffix keeps colliding prefixes apart.
pub fn generate(
    category: &str,
    brand: &str,
    name: &str,
    content_amount: Option<f64>,
    measurement_unit: MeasurementUnit,
    presentation: Presentation,
    product_type: ProductType,
) -> String {
    let suffix: u32 = rand::rng().random_range(0..10_000);
    format!(
        "{}{}{}-{}{}-{}{}-{:04}",
        code3(category),
        code3(brand),
        code3(name),
        content_amount.map_or(0, |c| c.round() as i64),
        unit_code(measurement_unit),
        presentation_code(presentation),
        type_code(product_type),
        suffix,
    )
}

/// First three alphanumeric characters, uppercased, padded with 'X'.
fn code3(value: &str) -> String {
    let mut code: String = value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    while code.len() < 3 {
        code.push('X');
    }
    code
}

fn unit_code(unit: MeasurementUnit) -> &'static str {
    match unit {
        MeasurementUnit::Gr => "GR",
        MeasurementUnit::Kg => "KG",
        MeasurementUnit::Ml => "ML",
        MeasurementUnit::Unidad => "UN",
    }
}

fn presentation_code(presentation: Presentation) -> &'static str {
    match presentation {
        Presentation::Vidrio => "V",
        Presentation::Planta => "P",
        Presentation::Empaquetado => "E",
    }
}

fn type_code(product_type: ProductType) -> &'static str {
    match product_type {
        ProductType::Core => "C",
        ProductType::NoCore => "N",
    }
}
