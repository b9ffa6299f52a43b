// src/handlers/product.rs
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use sqlx::Error as SqlxError;
use tracing::{error, instrument};

use crate::dtos::product::{CreateProductRequest, ProductResponse, ProductRow, UpdateProductRequest};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::product::SaleUnit;
use crate::state::AppState;

fn map_unique_violation(err: SqlxError, message: &str) -> AppError {
    match err {
        SqlxError::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            AppError::conflict(message)
        }
        other => other.into(),
    }
}

const PRODUCT_SELECT: &str = "SELECT p.id, p.sku, p.name,
        p.price::FLOAT8 AS price,
        p.product_type, p.sale_unit, p.presentation, p.measurement_unit,
        p.content_amount::FLOAT8 AS content_amount,
        p.stock,
        p.commission_margin::FLOAT8 AS commission_margin,
        b.name AS brand, c.name AS category,
        p.created_at
     FROM products p
     JOIN brands b ON b.id = p.brand_id
     JOIN categories c ON c.id = p.category_id";

// GET /admin/products - List all products, newest first
#[instrument(skip(state, auth))]
pub async fn get_products(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    auth.require_admin()?;

    match sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_SELECT} ORDER BY p.id DESC"))
        .fetch_all(&state.db_pool)
        .await
    {
        Ok(products) => Ok(Json(products.into_iter().map(ProductResponse::from).collect())),
        Err(e) => {
            error!(?e, "Failed to fetch products");
            Err(e.into())
        }
    }
}

// GET /admin/products/:id - Get single product
#[instrument(skip(state, auth), fields(id))]
pub async fn get_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<ProductResponse>, AppError> {
    auth.require_admin()?;

    let product = sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_SELECT} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Producto no encontrado"))?;

    Ok(Json(ProductResponse::from(product)))
}

fn validate_create(payload: &CreateProductRequest) -> Result<(), AppError> {
    if payload.sku.trim().is_empty() {
        return Err(AppError::validation("El SKU es obligatorio"));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("El nombre es obligatorio"));
    }
    if payload.price <= 0.0 {
        return Err(AppError::validation("El precio debe ser mayor que cero"));
    }
    if payload.stock < 0 {
        return Err(AppError::validation("El stock no puede ser negativo"));
    }
    if !(0.0..=100.0).contains(&payload.commission_margin) {
        return Err(AppError::validation("El margen debe estar entre 0 y 100%"));
    }
    if payload.sale_unit == SaleUnit::Peso && payload.content_amount.is_none() {
        return Err(AppError::validation(
            "El contenido es obligatorio para productos vendidos por peso",
        ));
    }
    Ok(())
}

// POST /admin/products - Create new product
#[instrument(skip(state, auth, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    auth.require_admin()?;
    validate_create(&payload)?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO products
            (sku, name, price, product_type, sale_unit, presentation,
             measurement_unit, content_amount, stock, commission_margin,
             brand_id, category_id, created_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
         RETURNING id",
    )
    .bind(payload.sku.trim())
    .bind(payload.name.trim())
    .bind(payload.price)
    .bind(payload.product_type)
    .bind(payload.sale_unit)
    .bind(payload.presentation)
    .bind(payload.measurement_unit)
    .bind(payload.content_amount)
    .bind(payload.stock)
    .bind(payload.commission_margin)
    .bind(payload.brand_id)
    .bind(payload.category_id)
    .bind(auth.user_id)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "El SKU ya existe"))?;

    let product = sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_SELECT} WHERE p.id = $1"))
        .bind(id)
        .fetch_one(&state.db_pool)
        .await?;

    Ok(Json(ProductResponse::from(product)))
}

// PUT /admin/products/:id - Update product
#[instrument(skip(state, auth, payload), fields(id))]
pub async fn update_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    auth.require_admin()?;

    if let Some(price) = payload.price {
        if price <= 0.0 {
            return Err(AppError::validation("El precio debe ser mayor que cero"));
        }
    }
    if let Some(stock) = payload.stock {
        if stock < 0 {
            return Err(AppError::validation("El stock no puede ser negativo"));
        }
    }

    let updated = sqlx::query(
        "UPDATE products SET
            name = COALESCE($1, name),
            price = COALESCE($2, price),
            product_type = COALESCE($3, product_type),
            sale_unit = COALESCE($4, sale_unit),
            presentation = COALESCE($5, presentation),
            measurement_unit = COALESCE($6, measurement_unit),
            content_amount = COALESCE($7, content_amount),
            stock = COALESCE($8, stock),
            commission_margin = COALESCE($9, commission_margin),
            brand_id = COALESCE($10, brand_id),
            category_id = COALESCE($11, category_id)
         WHERE id = $12",
    )
    .bind(payload.name)
    .bind(payload.price)
    .bind(payload.product_type)
    .bind(payload.sale_unit)
    .bind(payload.presentation)
    .bind(payload.measurement_unit)
    .bind(payload.content_amount)
    .bind(payload.stock)
    .bind(payload.commission_margin)
    .bind(payload.brand_id)
    .bind(payload.category_id)
    .bind(id)
    .execute(&state.db_pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Producto no encontrado"));
    }

    let product = sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_SELECT} WHERE p.id = $1"))
        .bind(id)
        .fetch_one(&state.db_pool)
        .await?;

    Ok(Json(ProductResponse::from(product)))
}

// DELETE /admin/products/:id - Delete product
#[instrument(skip(state, auth), fields(id))]
pub async fn delete_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<()>, AppError> {
    auth.require_admin()?;

    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Producto no encontrado"));
    }

    Ok(Json(()))
}
