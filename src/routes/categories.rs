use axum::{middleware, routing::get, Router};
use crate::handlers::category::{create_category, get_categories};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/categories", get(get_categories).post(create_category))
        .layer(middleware::from_fn(require_auth))
}
