// src/handlers/user.rs
use axum::{extract::State, Extension, Json};
use bcrypt::{hash, verify, DEFAULT_COST};
use tracing::instrument;

use crate::auth::jwt::{sign_token, TOKEN_TTL_SECONDS};
use crate::dtos::user::{LoginRequest, LoginResponse, MeResponse, RegisterUserRequest, UserResponse};
use crate::error::AppError;
use crate::middleware::auth::{AuthContext, ROLE_ADMIN};
use crate::models::user::User;
use crate::state::AppState;

const ROLE_USER: &str = "USER";

// POST /auth/register
#[instrument(skip(state, payload))]
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<(axum::http::StatusCode, Json<UserResponse>), AppError> {
    if payload.role != ROLE_ADMIN && payload.role != ROLE_USER {
        return Err(AppError::validation("Rol inválido"));
    }
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("El usuario es obligatorio"));
    }
    if payload.password.len() < 6 {
        return Err(AppError::validation("La contraseña es demasiado corta"));
    }

    let password_hash = hash(&payload.password, DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Hash error: {e}")))?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, password_hash, role)
         VALUES ($1, $2, $3)
         RETURNING id, username, password_hash, role, is_active, created_at",
    )
    .bind(payload.username.trim())
    .bind(&password_hash)
    .bind(&payload.role)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| {
        if let Some(db_err) = e.as_database_error() {
            if db_err.code().as_deref() == Some("23505") {
                return AppError::conflict("El usuario ya existe");
            }
        }
        AppError::db(e)
    })?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(UserResponse {
            id: user.id,
            username: user.username,
            role: user.role,
            is_active: user.is_active,
        }),
    ))
}

// POST /auth/login
#[instrument(skip(state, payload))]
pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::validation("Usuario y contraseña son obligatorios"));
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, role, is_active, created_at
         FROM users WHERE username = $1",
    )
    .bind(payload.username.trim())
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Credenciales inválidas"))?;

    if !user.is_active {
        return Err(AppError::conflict("Usuario inactivo"));
    }

    let ok = verify(&payload.password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verify error: {e}")))?;
    if !ok {
        return Err(AppError::not_found("Credenciales inválidas"));
    }

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::internal("JWT_SECRET is not set"))?;
    let access_token = sign_token(user.id, &user.role, &user.username, &secret)?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in_seconds: TOKEN_TTL_SECONDS,
    }))
}

// GET /auth/me
pub async fn get_me(Extension(auth): Extension<AuthContext>) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth.user_id,
        role: auth.role,
        username: auth.username,
    })
}
