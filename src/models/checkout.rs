use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub whatsapp_url: String,
    pub message: String,
    pub total: Decimal,
}
