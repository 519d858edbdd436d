use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::Product,
};

/// Payload for both create and full-replace update of a product.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
}

impl CreateProductRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".into()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::Validation("description must not be empty".into()));
        }
        if self.price < Decimal::ZERO {
            return Err(AppError::Validation("price must not be negative".into()));
        }
        if self.stock < 0 {
            return Err(AppError::Validation("stock must not be negative".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}
