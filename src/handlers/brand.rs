// src/handlers/brand.rs
use axum::{extract::State, Extension, Json};
use tracing::instrument;

use crate::dtos::brand::{BrandResponse, CreateBrandRequest};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::brand::Brand;
use crate::state::AppState;

// GET /admin/brands - List all brands, name-sorted
#[instrument(skip(state, auth))]
pub async fn get_brands(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<BrandResponse>>, AppError> {
    auth.require_admin()?;

    let brands = sqlx::query_as::<_, Brand>(
        "SELECT id, name, created_at FROM brands ORDER BY name ASC",
    )
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(brands.into_iter().map(BrandResponse::from).collect()))
}

// POST /admin/brands - Create brand
#[instrument(skip(state, auth, payload))]
pub async fn create_brand(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateBrandRequest>,
) -> Result<Json<BrandResponse>, AppError> {
    auth.require_admin()?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("El nombre de la marca es obligatorio"));
    }

    let brand = sqlx::query_as::<_, Brand>(
        "INSERT INTO brands (name) VALUES ($1)
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
         RETURNING id, name, created_at",
    )
    .bind(name)
    .fetch_one(&state.db_pool)
    .await?;

    Ok(Json(BrandResponse::from(brand)))
}
