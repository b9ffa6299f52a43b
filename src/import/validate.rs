// src/import/validate.rs
//
// Mandatory-field checks plus the lenient numeric coercion the spreadsheet
// format calls for. A row that fails here is skipped before anything touches
// the store.

use crate::import::{normalize, row::RawRow, sku, SkuPolicy};
use crate::models::product::{MeasurementUnit, Presentation, ProductType, SaleUnit};

pub const MISSING_FIELDS_MESSAGE: &str = "Faltan datos obligatorios (SKU, Nombre o Precio)";

/// A fully normalized row, ready for the upsert engine.
#[derive(Debug, Clone)]
pub struct ProductData {
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
    pub brand_name: String,
    pub category_name: String,
}

fn cell<'a>(value: &'a Option<String>) -> &'a str {
    value.as_deref().unwrap_or("").trim()
}

/// Validates one raw row and normalizes it into [`ProductData`].
///
/// Name and a positive price are always mandatory; the SKU is mandatory under
/// [`SkuPolicy::Required`] and derived from the other fields under
/// [`SkuPolicy::Generate`]. Stock and commission tolerate blank or malformed
/// cells (zero) and are clamped to their valid ranges.
pub fn validate_row(raw: &RawRow, sku_policy: SkuPolicy) -> Result<ProductData, String> {
    let name = cell(&raw.name);
    let price = cell(&raw.price).parse::<f64>().ok();

    let price_ok = price.is_some_and(|p| p > 0.0);
    if name.is_empty() || !price_ok {
        return Err(MISSING_FIELDS_MESSAGE.to_string());
    }

    let product_type = normalize::product_type(cell(&raw.product_type));
    let sale_unit = normalize::sale_unit(cell(&raw.sale_unit));
    let presentation = normalize::presentation(cell(&raw.presentation));
    let measurement_unit = normalize::measurement_unit(cell(&raw.measurement_unit));

    let content_amount = cell(&raw.content_amount).parse::<f64>().ok();
    let stock = cell(&raw.stock).parse::<i32>().unwrap_or(0).max(0);
    let commission_margin = cell(&raw.commission_margin)
        .parse::<f64>()
        .unwrap_or(0.0)
        .clamp(0.0, 100.0);

    let brand_name = cell(&raw.brand).to_string();
    let category_name = cell(&raw.category).to_string();

    let given_sku = cell(&raw.sku);
    let sku = if !given_sku.is_empty() {
        given_sku.to_string()
    } else {
        match sku_policy {
            SkuPolicy::Required => return Err(MISSING_FIELDS_MESSAGE.to_string()),
            SkuPolicy::Generate => sku::generate(
                &category_name,
                &brand_name,
                name,
                content_amount,
                measurement_unit,
                presentation,
                product_type,
            ),
        }
    };

    Ok(ProductData {
        sku,
        name: name.to_string(),
        price: price.unwrap_or_default(),
        product_type,
        sale_unit,
        presentation,
        measurement_unit,
        content_amount,
        stock,
        commission_margin,
        brand_name,
        category_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_row() -> RawRow {
        RawRow {
            sku: Some("PRD101".into()),
            name: Some("Producto Importado 1".into()),
            price: Some("199.99".into()),
            product_type: Some("CORE".into()),
            sale_unit: Some("UNIDAD".into()),
            presentation: Some("EMPAQUETADO".into()),
            measurement_unit: Some("UNIDAD".into()),
            content_amount: None,
            stock: Some("25".into()),
            commission_margin: Some("12.5".into()),
            brand: Some("Nueva Marca".into()),
            category: Some("Nueva Categoría".into()),
        }
    }

    #[test]
    fn accepts_complete_row() {
        let data = validate_row(&full_row(), SkuPolicy::Required).unwrap();
        assert_eq!(data.sku, "PRD101");
        assert_eq!(data.name, "Producto Importado 1");
        assert_eq!(data.price, 199.99);
        assert_eq!(data.product_type, ProductType::Core);
        assert_eq!(data.stock, 25);
        assert_eq!(data.commission_margin, 12.5);
        assert_eq!(data.brand_name, "Nueva Marca");
    }

    #[test]
    fn rejects_missing_name() {
        let mut row = full_row();
        row.name = None;
        let err = validate_row(&row, SkuPolicy::Required).unwrap_err();
        assert_eq!(err, MISSING_FIELDS_MESSAGE);

        row.name = Some("   ".into());
        assert!(validate_row(&row, SkuPolicy::Required).is_err());
    }

    #[test]
    fn rejects_missing_or_nonpositive_price() {
        let mut row = full_row();
        row.price = None;
        assert!(validate_row(&row, SkuPolicy::Required).is_err());

        row.price = Some("0".into());
        assert!(validate_row(&row, SkuPolicy::Required).is_err());

        row.price = Some("-5".into());
        assert!(validate_row(&row, SkuPolicy::Required).is_err());

        row.price = Some("no-numero".into());
        assert!(validate_row(&row, SkuPolicy::Required).is_err());
    }

    #[test]
    fn sku_required_policy_rejects_blank_sku() {
        let mut row = full_row();
        row.sku = Some("".into());
        let err = validate_row(&row, SkuPolicy::Required).unwrap_err();
        assert_eq!(err, MISSING_FIELDS_MESSAGE);
    }

    #[test]
    fn sku_generate_policy_fills_blank_sku() {
        let mut row = full_row();
        row.sku = None;
        let data = validate_row(&row, SkuPolicy::Generate).unwrap();
        assert!(!data.sku.is_empty());
        assert!(data.sku.starts_with("NUENUEPRO-"), "got {}", data.sku);
    }

    #[test]
    fn sku_generate_policy_keeps_given_sku() {
        let data = validate_row(&full_row(), SkuPolicy::Generate).unwrap();
        assert_eq!(data.sku, "PRD101");
    }

    #[test]
    fn lenient_numeric_cells() {
        let mut row = full_row();
        row.stock = None;
        row.commission_margin = Some("abc".into());
        row.content_amount = Some("500".into());
        let data = validate_row(&row, SkuPolicy::Required).unwrap();
        assert_eq!(data.stock, 0);
        assert_eq!(data.commission_margin, 0.0);
        assert_eq!(data.content_amount, Some(500.0));
    }

    #[test]
    fn stock_and_margin_are_clamped() {
        let mut row = full_row();
        row.stock = Some("-10".into());
        row.commission_margin = Some("150".into());
        let data = validate_row(&row, SkuPolicy::Required).unwrap();
        assert_eq!(data.stock, 0);
        assert_eq!(data.commission_margin, 100.0);
    }

    #[test]
    fn unrecognized_enums_fall_back_to_defaults() {
        let mut row = full_row();
        row.product_type = Some("premium".into());
        row.sale_unit = Some("caja".into());
        row.presentation = None;
        row.measurement_unit = Some("litro".into());
        let data = validate_row(&row, SkuPolicy::Required).unwrap();
        assert_eq!(data.product_type, ProductType::Core);
        assert_eq!(data.sale_unit, SaleUnit::Unidad);
        assert_eq!(data.presentation, Presentation::Empaquetado);
        assert_eq!(data.measurement_unit, MeasurementUnit::Unidad);
    }
}
