use serde::{Deserialize, Serialize};

use crate::models::brand::Brand;

#[derive(Debug, Deserialize)]
pub struct CreateBrandRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct BrandResponse {
    pub id: i64,
    pub name: String,
}

impl From<Brand> for BrandResponse {
    fn from(brand: Brand) -> Self {
        Self { id: brand.id, name: brand.name }
    }
}
