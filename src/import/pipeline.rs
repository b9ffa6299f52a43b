// src/import/pipeline.rs
//
// Sequential batch upsert. One failing row records an error and the batch
// moves on; nothing a row already committed gets rolled back.

use serde::Serialize;
use tracing::{info, warn};

use crate::import::row::NumberedRow;
use crate::import::store::{ImportStore, NewProduct, ProductUpdate, StoreError};
use crate::import::validate::validate_row;
use crate::import::{ImportConfig, StockPolicy};
use crate::models::brand::Brand;
use crate::models::category::Category;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RowError {
    pub row: u32,
    pub message: String,
}

/// Batch aggregator, turned into the API response when the batch ends.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total_products: u32,
    pub new_products: u32,
    pub updated_products: u32,
    pub new_brands: u32,
    pub new_categories: u32,
    pub errors: Vec<RowError>,
}

pub async fn run_import<S: ImportStore + Sync>(
    store: &S,
    config: &ImportConfig,
    user_id: i64,
    rows: &[NumberedRow],
) -> ImportSummary {
    let mut summary = ImportSummary {
        total_products: rows.len() as u32,
        ..ImportSummary::default()
    };

    for numbered in rows {
        if let Err(message) = process_row(store, config, user_id, numbered, &mut summary).await {
            warn!(row = numbered.row, %message, "Import row failed");
            summary.errors.push(RowError { row: numbered.row, message });
        }
    }

    info!(
        total = summary.total_products,
        new = summary.new_products,
        updated = summary.updated_products,
        errors = summary.errors.len(),
        "Import batch finished"
    );
    summary
}

async fn process_row<S: ImportStore + Sync>(
    store: &S,
    config: &ImportConfig,
    user_id: i64,
    numbered: &NumberedRow,
    summary: &mut ImportSummary,
) -> Result<(), String> {
    let data = validate_row(&numbered.data, config.sku_policy)?;

    let brand = resolve_brand(store, &data.brand_name, summary)
        .await
        .map_err(|e| format!("Error en el procesamiento: {e}"))?;
    let category = resolve_category(store, &data.category_name, summary)
        .await
        .map_err(|e| format!("Error en el procesamiento: {e}"))?;

    let existing = store
        .find_product_by_sku(&data.sku)
        .await
        .map_err(|e| format!("Error en el procesamiento: {e}"))?;

    match existing {
        None => {
            store
                .create_product(NewProduct {
                    data: &data,
                    brand_id: brand.id,
                    category_id: category.id,
                    created_by: user_id,
                })
                .await
                .map_err(|e| format!("Error en el procesamiento: {e}"))?;
            summary.new_products += 1;
        }
        Some(product) => {
            let stock = match config.stock_policy {
                StockPolicy::Accumulate => product.stock.saturating_add(data.stock),
                StockPolicy::Replace => data.stock,
            };
            store
                .update_product(
                    product.id,
                    ProductUpdate {
                        data: &data,
                        brand_id: brand.id,
                        category_id: category.id,
                        stock,
                    },
                )
                .await
                .map_err(|e| format!("Error en el procesamiento: {e}"))?;
            summary.updated_products += 1;
        }
    }
    Ok(())
}

async fn resolve_brand<S: ImportStore + Sync>(
    store: &S,
    name: &str,
    summary: &mut ImportSummary,
) -> Result<Brand, StoreError> {
    if let Some(brand) = store.find_brand_by_name(name).await? {
        return Ok(brand);
    }
    let brand = store.create_brand(name).await?;
    summary.new_brands += 1;
    Ok(brand)
}

async fn resolve_category<S: ImportStore + Sync>(
    store: &S,
    name: &str,
    summary: &mut ImportSummary,
) -> Result<Category, StoreError> {
    if let Some(category) = store.find_category_by_name(name).await? {
        return Ok(category);
    }
    let category = store.create_category(name).await?;
    summary.new_categories += 1;
    Ok(category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::import::row::{parse_rows, RawRow};
    use crate::import::SkuPolicy;
    use crate::models::product::{MeasurementUnit, Presentation, Product, ProductType, SaleUnit};

    #[derive(Default)]
    struct Inner {
        products: HashMap<String, Product>,
        brands: HashMap<String, Brand>,
        categories: HashMap<String, Category>,
        next_id: i64,
    }

    /// In-memory double for the Postgres store. `fail_on_sku` injects a
    /// persistence failure for a single row.
    #[derive(Default)]
    struct MemoryStore {
        inner: Mutex<Inner>,
        fail_on_sku: Option<String>,
    }

    impl MemoryStore {
        fn with_product(sku: &str, stock: i32) -> Self {
            let store = MemoryStore::default();
            {
                let mut inner = store.inner.lock().unwrap();
                inner.next_id += 1;
                let id = inner.next_id;
                inner.products.insert(
                    sku.to_string(),
                    Product {
                        id,
                        sku: sku.to_string(),
                        name: "Existente".into(),
                        price: 10.0,
                        product_type: ProductType::Core,
                        sale_unit: SaleUnit::Unidad,
                        presentation: Presentation::Empaquetado,
                        measurement_unit: MeasurementUnit::Unidad,
                        content_amount: None,
                        stock,
                        commission_margin: 0.0,
                        brand_id: 1,
                        category_id: 1,
                        created_by: 1,
                        created_at: None,
                    },
                );
            }
            store
        }

        fn stock_of(&self, sku: &str) -> i32 {
            self.inner.lock().unwrap().products[sku].stock
        }

        fn brand_count(&self) -> usize {
            self.inner.lock().unwrap().brands.len()
        }
    }

    #[async_trait::async_trait]
    impl ImportStore for MemoryStore {
        async fn find_product_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
            Ok(self.inner.lock().unwrap().products.get(sku).cloned())
        }

        async fn create_product(&self, new: NewProduct<'_>) -> Result<(), StoreError> {
            if self.fail_on_sku.as_deref() == Some(new.data.sku.as_str()) {
                return Err(StoreError::new("duplicate key value"));
            }
            let mut inner = self.inner.lock().unwrap();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.products.insert(
                new.data.sku.clone(),
                Product {
                    id,
                    sku: new.data.sku.clone(),
                    name: new.data.name.clone(),
                    price: new.data.price,
                    product_type: new.data.product_type,
                    sale_unit: new.data.sale_unit,
                    presentation: new.data.presentation,
                    measurement_unit: new.data.measurement_unit,
                    content_amount: new.data.content_amount,
                    stock: new.data.stock,
                    commission_margin: new.data.commission_margin,
                    brand_id: new.brand_id,
                    category_id: new.category_id,
                    created_by: new.created_by,
                    created_at: None,
                },
            );
            Ok(())
        }

        async fn update_product(&self, id: i64, update: ProductUpdate<'_>) -> Result<(), StoreError> {
            let mut inner = self.inner.lock().unwrap();
            let product = inner
                .products
                .values_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| StoreError::new("product not found"))?;
            product.name = update.data.name.clone();
            product.price = update.data.price;
            product.product_type = update.data.product_type;
            product.sale_unit = update.data.sale_unit;
            product.presentation = update.data.presentation;
            product.measurement_unit = update.data.measurement_unit;
            product.content_amount = update.data.content_amount;
            product.stock = update.stock;
            product.commission_margin = update.data.commission_margin;
            product.brand_id = update.brand_id;
            product.category_id = update.category_id;
            Ok(())
        }

        async fn find_brand_by_name(&self, name: &str) -> Result<Option<Brand>, StoreError> {
            Ok(self.inner.lock().unwrap().brands.get(name).cloned())
        }

        async fn create_brand(&self, name: &str) -> Result<Brand, StoreError> {
            let mut inner = self.inner.lock().unwrap();
            inner.next_id += 1;
            let brand = Brand { id: inner.next_id, name: name.to_string(), created_at: None };
            inner.brands.insert(name.to_string(), brand.clone());
            Ok(brand)
        }

        async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, StoreError> {
            Ok(self.inner.lock().unwrap().categories.get(name).cloned())
        }

        async fn create_category(&self, name: &str) -> Result<Category, StoreError> {
            let mut inner = self.inner.lock().unwrap();
            inner.next_id += 1;
            let category =
                Category { id: inner.next_id, name: name.to_string(), created_at: None };
            inner.categories.insert(name.to_string(), category.clone());
            Ok(category)
        }
    }

    fn config() -> ImportConfig {
        ImportConfig::default()
    }

    fn row(number: u32, sku: &str, name: &str, price: &str, stock: &str, brand: &str) -> NumberedRow {
        NumberedRow {
            row: number,
            data: RawRow {
                sku: Some(sku.into()),
                name: Some(name.into()),
                price: Some(price.into()),
                stock: Some(stock.into()),
                brand: Some(brand.into()),
                category: Some("Categoría".into()),
                ..RawRow::default()
            },
        }
    }

    #[tokio::test]
    async fn creates_new_products_and_updates_existing() {
        let store = MemoryStore::with_product("PRD200", 10);
        let rows = vec![
            row(2, "PRD101", "Producto Importado 1", "199.99", "25", "Nueva Marca"),
            row(3, "PRD200", "Actualizado", "49.99", "5", "Nueva Marca"),
        ];

        let summary = run_import(&store, &config(), 1, &rows).await;

        assert_eq!(summary.total_products, 2);
        assert_eq!(summary.new_products, 1);
        assert_eq!(summary.updated_products, 1);
        assert!(summary.new_brands >= 1);
        assert!(summary.errors.is_empty());
    }

    #[tokio::test]
    async fn accumulate_policy_adds_stock() {
        let store = MemoryStore::with_product("PRD200", 10);
        let rows = vec![row(2, "PRD200", "Existente", "10", "5", "Marca")];

        let summary = run_import(&store, &config(), 1, &rows).await;

        assert!(summary.errors.is_empty());
        assert_eq!(store.stock_of("PRD200"), 15);
    }

    #[tokio::test]
    async fn replace_policy_overwrites_stock() {
        let store = MemoryStore::with_product("PRD200", 10);
        let rows = vec![row(2, "PRD200", "Existente", "10", "5", "Marca")];
        let config = ImportConfig { stock_policy: StockPolicy::Replace, ..config() };

        let summary = run_import(&store, &config, 1, &rows).await;

        assert!(summary.errors.is_empty());
        assert_eq!(store.stock_of("PRD200"), 5);
    }

    #[tokio::test]
    async fn one_brand_per_distinct_name() {
        let store = MemoryStore::default();
        let rows = vec![
            row(2, "A1", "Uno", "1", "1", "Marca A"),
            row(3, "A2", "Dos", "1", "1", "Marca A"),
            row(4, "A3", "Tres", "1", "1", "Marca B"),
        ];

        let summary = run_import(&store, &config(), 1, &rows).await;

        assert_eq!(summary.new_brands, 2);
        assert_eq!(store.brand_count(), 2);
    }

    #[tokio::test]
    async fn invalid_row_is_skipped_and_reported() {
        let store = MemoryStore::default();
        let mut bad = row(3, "A2", "Sin Precio", "", "1", "Marca");
        bad.data.price = None;
        let rows = vec![row(2, "A1", "Bueno", "10", "1", "Marca"), bad];

        let summary = run_import(&store, &config(), 1, &rows).await;

        assert_eq!(summary.new_products, 1);
        assert_eq!(summary.updated_products, 0);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].row, 3);
        assert!(summary.errors[0].message.contains("Faltan datos obligatorios"));
    }

    #[tokio::test]
    async fn persistence_failure_does_not_abort_the_batch() {
        let store = MemoryStore { fail_on_sku: Some("A1".into()), ..MemoryStore::default() };
        let rows = vec![
            row(2, "A1", "Falla", "10", "1", "Marca"),
            row(3, "A2", "Pasa", "10", "1", "Marca"),
        ];

        let summary = run_import(&store, &config(), 1, &rows).await;

        assert_eq!(summary.new_products, 1);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].row, 2);
        assert!(summary.errors[0].message.starts_with("Error en el procesamiento"));
    }

    #[tokio::test]
    async fn importing_twice_updates_instead_of_duplicating() {
        let store = MemoryStore::default();
        let rows = vec![row(2, "A1", "Uno", "10", "5", "Marca")];

        let first = run_import(&store, &config(), 1, &rows).await;
        let second = run_import(&store, &config(), 1, &rows).await;

        assert_eq!(first.new_products, 1);
        assert_eq!(second.new_products, 0);
        assert_eq!(second.updated_products, 1);
        assert!(second.errors.is_empty());
        // Accumulate is the default policy.
        assert_eq!(store.stock_of("A1"), 10);
    }

    #[tokio::test]
    async fn csv_bytes_end_to_end() {
        let csv = "SKU,Nombre,Precio,TipoProducto,UnidadDeVenta,Presentacion,UnidadMedida,Contenido,Stock,MargenCommission,Marca,Categoria\n\
                   PRD101,Producto Importado 1,199.99,CORE,UNIDAD,EMPAQUETADO,UNIDAD,,25,12.5,Nueva Marca,Nueva Categoría\n\
                   PRD200,Producto Existente,49.99,NO_CORE,PESO,VIDRIO,GR,500,50,8,Marca Existente,Categoría Existente\n";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        let store = MemoryStore::with_product("PRD200", 10);

        let summary = run_import(&store, &config(), 1, &rows).await;

        assert_eq!(summary.total_products, 2);
        assert_eq!(summary.new_products, 1);
        assert_eq!(summary.updated_products, 1);
        assert!(summary.new_brands >= 1);
        assert!(summary.errors.is_empty());
        assert_eq!(store.stock_of("PRD200"), 60);
    }

    #[tokio::test]
    async fn generated_skus_under_generate_policy() {
        let store = MemoryStore::default();
        let mut no_sku = row(2, "", "Sin SKU", "10", "1", "Marca");
        no_sku.data.sku = None;
        let config = ImportConfig { sku_policy: SkuPolicy::Generate, ..config() };

        let summary = run_import(&store, &config, 1, &[no_sku]).await;

        assert_eq!(summary.new_products, 1);
        assert!(summary.errors.is_empty());
        let inner = store.inner.lock().unwrap();
        assert_eq!(inner.products.len(), 1);
        assert!(!inner.products.keys().next().unwrap().is_empty());
    }
}
