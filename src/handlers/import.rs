// src/handlers/import.rs
use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;
use tokio::time::timeout;
use tracing::{error, instrument};

use crate::dtos::import::ImportResponse;
use crate::import::pipeline::run_import;
use crate::import::row::{parse_rows, TEMPLATE_HEADERS};
use crate::import::store::PgStore;
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

/// Failure modes of the import endpoint. Batch-level failures use the
/// structured `{ success: false, ... }` body the admin UI renders; everything
/// else is a plain `{ error }`.
#[derive(Debug)]
pub enum ImportFailure {
    Unauthorized,
    BadRequest(String),
    Batch(String),
}

impl IntoResponse for ImportFailure {
    fn into_response(self) -> Response {
        match self {
            ImportFailure::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "No autorizado" })),
            )
                .into_response(),
            ImportFailure::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ImportFailure::Batch(msg) => {
                error!(error = %msg, "Import batch failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "Error en el proceso de importación",
                        "error": msg,
                    })),
                )
                    .into_response()
            }
        }
    }
}

// POST /admin/products/import - Upload a spreadsheet and upsert its rows
#[instrument(skip(state, auth, multipart), fields(user_id = auth.user_id))]
pub async fn import_products(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    multipart: Multipart,
) -> Result<Json<ImportResponse>, ImportFailure> {
    if auth.require_admin().is_err() {
        return Err(ImportFailure::Unauthorized);
    }

    let bytes = read_file_field(multipart).await?;
    let rows = parse_rows(&bytes).map_err(|e| ImportFailure::BadRequest(e.to_string()))?;

    let config = &state.import_config;
    if rows.len() > config.max_rows {
        return Err(ImportFailure::BadRequest(format!(
            "El archivo supera el máximo de {} filas",
            config.max_rows
        )));
    }

    let store = PgStore::new(&state.db_pool);
    let summary = timeout(
        Duration::from_secs(config.timeout_secs),
        run_import(&store, config, auth.user_id, &rows),
    )
    .await
    .map_err(|_| ImportFailure::Batch("La importación excedió el tiempo máximo".to_string()))?;

    Ok(Json(ImportResponse::completed(summary)))
}

async fn read_file_field(mut multipart: Multipart) -> Result<Vec<u8>, ImportFailure> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ImportFailure::BadRequest(format!("Formulario inválido: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ImportFailure::BadRequest(format!("No se pudo leer el archivo: {e}")))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(ImportFailure::BadRequest(
        "No se encontró un archivo para importar".to_string(),
    ))
}

const TEMPLATE_EXAMPLE_ROW: &str =
    "PRD001,Ejemplo Producto,99.99,CORE,UNIDAD,EMPAQUETADO,UNIDAD,,10,15,Marca Ejemplo,Categoría Ejemplo";

// GET /admin/products/import/template - Static CSV template download
pub async fn download_template() -> impl IntoResponse {
    let body = format!("{}\n{}\n", TEMPLATE_HEADERS.join(","), TEMPLATE_EXAMPLE_ROW);
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"plantilla_importacion_productos.csv\"",
            ),
        ],
        body,
    )
}
