use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Product;

// DB models

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartLine {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart line joined with its product. Not persisted; the unit the
/// aggregation logic and the cart views operate on.
#[derive(Debug, Clone)]
pub struct CartView {
    pub id: i32,
    pub quantity: i32,
    pub product: Product,
}

impl CartView {
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

// Request types

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: i32,
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

// Response types

#[derive(Debug, Serialize)]
pub struct CartLineResponse {
    pub id: i32,
    pub quantity: i32,
    pub subtotal: Decimal,
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct CartSummary {
    pub items: Vec<CartLineResponse>,
    pub total: Decimal,
    pub item_count: usize,
}
