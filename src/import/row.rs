// src/import/row.rs
//
// Turns uploaded bytes into an ordered sequence of raw rows. Row numbers are
// 1-based spreadsheet rows: the header occupies row 1, so the first data row
// is row 2 and that is the number shown in error reports.

use std::fmt;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

pub const TEMPLATE_HEADERS: [&str; 12] = [
    "SKU",
    "Nombre",
    "Precio",
    "TipoProducto",
    "UnidadDeVenta",
    "Presentacion",
    "UnidadMedida",
    "Contenido",
    "Stock",
    "MargenCommission",
    "Marca",
    "Categoria",
];

/// One spreadsheet row as read, before any normalization. Accepts both the
/// template's headers and their lower-case variants.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawRow {
    #[serde(default, alias = "SKU")]
    pub sku: Option<String>,
    #[serde(default, rename = "Nombre", alias = "nombre")]
    pub name: Option<String>,
    #[serde(default, rename = "Precio", alias = "precio")]
    pub price: Option<String>,
    #[serde(default, rename = "TipoProducto", alias = "tipoProducto")]
    pub product_type: Option<String>,
    #[serde(default, rename = "UnidadDeVenta", alias = "unidadDeVenta")]
    pub sale_unit: Option<String>,
    #[serde(default, rename = "Presentacion", alias = "presentacion")]
    pub presentation: Option<String>,
    #[serde(default, rename = "UnidadMedida", alias = "unidadMedida")]
    pub measurement_unit: Option<String>,
    #[serde(default, rename = "Contenido", alias = "contenido")]
    pub content_amount: Option<String>,
    #[serde(default, rename = "Stock", alias = "stock")]
    pub stock: Option<String>,
    #[serde(default, rename = "MargenCommission", alias = "margenCommission")]
    pub commission_margin: Option<String>,
    #[serde(default, rename = "Marca", alias = "marca")]
    pub brand: Option<String>,
    #[serde(default, rename = "Categoria", alias = "categoria")]
    pub category: Option<String>,
}

impl RawRow {
    fn is_blank(&self) -> bool {
        [
            &self.sku,
            &self.name,
            &self.price,
            &self.product_type,
            &self.sale_unit,
            &self.presentation,
            &self.measurement_unit,
            &self.content_amount,
            &self.stock,
            &self.commission_margin,
            &self.brand,
            &self.category,
        ]
        .into_iter()
        .all(|f| f.as_deref().map_or(true, |v| v.trim().is_empty()))
    }
}

#[derive(Debug, Clone)]
pub struct NumberedRow {
    pub row: u32,
    pub data: RawRow,
}

#[derive(Debug)]
pub enum FileError {
    /// Binary Excel workbook; the server ingests CSV only.
    ExcelWorkbook,
    Malformed(String),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::ExcelWorkbook => {
                write!(f, "Los archivos Excel deben exportarse como CSV antes de importarlos")
            }
            FileError::Malformed(msg) => {
                write!(f, "No se pudo interpretar el archivo: {msg}")
            }
        }
    }
}

/// Parses the uploaded file into numbered rows, skipping fully blank lines.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<NumberedRow>, FileError> {
    // xlsx is a zip archive, legacy xls an OLE compound file.
    if bytes.starts_with(b"PK\x03\x04") || bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0]) {
        return Err(FileError::ExcelWorkbook);
    }

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| FileError::Malformed(e.to_string()))?
        .clone();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| FileError::Malformed(e.to_string()))?;
        // The reader silently drops bare empty lines, so the record's own
        // position is the only reliable spreadsheet row number. Header is
        // row 1, so the fallback for a missing position is idx + 2.
        let row = record.position().map_or(idx as u64 + 2, |p| p.line()) as u32;
        let data: RawRow = record
            .deserialize(Some(&headers))
            .map_err(|e| FileError::Malformed(e.to_string()))?;
        if data.is_blank() {
            continue;
        }
        rows.push(NumberedRow { row, data });
    }
    Ok(rows)
}
