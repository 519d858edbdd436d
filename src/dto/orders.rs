use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Order, OrderItem},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub status: String,
}

impl CreateOrderRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.status.trim().is_empty() {
            return Err(AppError::Validation("status must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderItemRequest {
    pub product_id: i32,
    pub quantity: i32,
}

impl CreateOrderItemRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.quantity <= 0 {
            return Err(AppError::Validation("quantity must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

impl UpdateOrderStatusRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.status.trim().is_empty() {
            return Err(AppError::Validation("status must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_or_negative_quantity() {
        for quantity in [0, -3] {
            let payload = CreateOrderItemRequest {
                product_id: 1,
                quantity,
            };
            assert!(matches!(
                payload.validate(),
                Err(AppError::Validation(_))
            ));
        }
    }

    #[test]
    fn accepts_positive_quantity() {
        let payload = CreateOrderItemRequest {
            product_id: 1,
            quantity: 1,
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn rejects_blank_status() {
        let payload = UpdateOrderStatusRequest { status: " ".into() };
        assert!(matches!(
            payload.validate(),
            Err(AppError::Validation(_))
        ));
    }
}
