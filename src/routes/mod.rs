pub mod brands;
pub mod categories;
pub mod imports;
pub mod products;
pub mod users;

use axum::Router;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(products::routes())
        .merge(imports::routes())
        .merge(brands::routes())
        .merge(categories::routes())
        .merge(users::routes())
}
