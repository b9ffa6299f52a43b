// src/import/mod.rs
//
// Spreadsheet product import: CSV bytes in, per-row upserts out, with one
// summary per batch. Rows are processed sequentially and failures never
// cross row boundaries.

pub mod normalize;
pub mod pipeline;
pub mod row;
pub mod sku;
pub mod store;
pub mod validate;

/// What to do with the stock column when the SKU already exists.
/// Accumulate treats the column as a delta on top of the current stock;
/// Replace overwrites it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockPolicy {
    Accumulate,
    Replace,
}

/// Whether the SKU column is mandatory input or may be left blank and
/// derived from the other fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkuPolicy {
    Required,
    Generate,
}

#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub stock_policy: StockPolicy,
    pub sku_policy: SkuPolicy,
    pub max_rows: usize,
    pub timeout_secs: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            stock_policy: StockPolicy::Accumulate,
            sku_policy: SkuPolicy::Required,
            max_rows: 10_000,
            timeout_secs: 120,
        }
    }
}

impl ImportConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let stock_policy = match std::env::var("OXA_IMPORT_STOCK_POLICY").as_deref() {
            Ok("replace") => StockPolicy::Replace,
            Ok("accumulate") => StockPolicy::Accumulate,
            Ok(other) => {
                tracing::warn!(value = other, "Unknown OXA_IMPORT_STOCK_POLICY, using accumulate");
                StockPolicy::Accumulate
            }
            Err(_) => defaults.stock_policy,
        };
        let sku_policy = match std::env::var("OXA_IMPORT_SKU_POLICY").as_deref() {
            Ok("generate") => SkuPolicy::Generate,
            Ok("required") => SkuPolicy::Required,
            Ok(other) => {
                tracing::warn!(value = other, "Unknown OXA_IMPORT_SKU_POLICY, using required");
                SkuPolicy::Required
            }
            Err(_) => defaults.sku_policy,
        };
        let max_rows = std::env::var("OXA_IMPORT_MAX_ROWS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_rows);
        let timeout_secs = std::env::var("OXA_IMPORT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self { stock_policy, sku_policy, max_rows, timeout_secs }
    }
}
