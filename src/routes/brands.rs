use axum::{middleware, routing::get, Router};
use crate::handlers::brand::{create_brand, get_brands};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/brands", get(get_brands).post(create_brand))
        .layer(middleware::from_fn(require_auth))
}
