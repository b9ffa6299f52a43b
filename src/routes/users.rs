use axum::{middleware, routing::{get, post}, Router};
use crate::handlers::user::{get_me, login_user, register_user};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let open = Router::new()
        .route("/auth/register", post(register_user))
        .route("/auth/login", post(login_user));

    let protected = Router::new()
        .route("/auth/me", get(get_me))
        .layer(middleware::from_fn(require_auth));

    open.merge(protected)
}
