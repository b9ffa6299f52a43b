// src/handlers/category.rs
use axum::{extract::State, Extension, Json};
use tracing::instrument;

use crate::dtos::category::{CategoryResponse, CreateCategoryRequest};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::category::Category;
use crate::state::AppState;

// GET /admin/categories - List all categories, name-sorted
#[instrument(skip(state, auth))]
pub async fn get_categories(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    auth.require_admin()?;

    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, created_at FROM categories ORDER BY name ASC",
    )
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

// POST /admin/categories - Create category
#[instrument(skip(state, auth, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    auth.require_admin()?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("El nombre de la categoría es obligatorio"));
    }

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name) VALUES ($1)
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
         RETURNING id, name, created_at",
    )
    .bind(name)
    .fetch_one(&state.db_pool)
    .await?;

    Ok(Json(CategoryResponse::from(category)))
}
