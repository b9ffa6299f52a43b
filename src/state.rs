// src/state.rs
use sqlx::PgPool;

use crate::import::ImportConfig;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub import_config: ImportConfig,
}

impl AppState {
    pub fn new(db_pool: PgPool, import_config: ImportConfig) -> Self {
        Self { db_pool, import_config }
    }
}
