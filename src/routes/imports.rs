use axum::{middleware, routing::{get, post}, Router};
use crate::handlers::import::{download_template, import_products};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/products/import", post(import_products))
        .route("/admin/products/import/template", get(download_template))
        .layer(middleware::from_fn(require_auth))
}
