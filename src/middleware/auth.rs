use axum::response::{Response, IntoResponse};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use serde_json::json;

use crate::auth::jwt::verify_token;
use crate::error::AppError;

pub const ROLE_ADMIN: &str = "ADMIN";

#[derive(Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub role: String,
    pub username: String,
}

impl AuthContext {
    /// Admin gate used by every back-office handler.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == ROLE_ADMIN {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

pub async fn require_auth(mut req: Request<axum::body::Body>, next: Next) -> Response {
    let auth_header = match req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok()) {
        Some(h) => h,
        None => return unauthorized("Missing Authorization header"),
    };

    // Expect "Bearer <token>"
    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return unauthorized("Invalid Authorization format"),
    };

    let secret = match std::env::var("JWT_SECRET") {
        Ok(s) => s,
        Err(_) => return unauthorized("Server auth misconfiguration"),
    };

    let claims = match verify_token(token, &secret) {
        Ok(c) => c,
        Err(e) => return unauthorized(&format!("{e:?}")),
    };

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        role: claims.role,
        username: claims.username,
    });

    next.run(req).await
}

fn unauthorized(reason: &str) -> Response {
    tracing::warn!(reason, "Rejected unauthenticated request");
    // Contract: auth failures always answer with this body.
    let body = axum::Json(json!({ "error": "No autorizado" }));
    (StatusCode::UNAUTHORIZED, body).into_response()
}
