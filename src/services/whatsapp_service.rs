use std::fmt::Write;

use rust_decimal::Decimal;

use crate::models::{CartView, CheckoutRequest};

const WA_BASE_URL: &str = "https://wa.me";

/// Human-readable order summary handed to WhatsApp. Money is rounded to two
/// places here, at the display boundary, never during accumulation.
pub fn format_order_message(
    store_name: &str,
    contact: &CheckoutRequest,
    views: &[CartView],
    total: Decimal,
) -> String {
    let country = contact.country.as_deref().unwrap_or("Brasil");

    let mut products_list = String::new();
    for view in views {
        let _ = writeln!(
            products_list,
            "• {} - Qtd: {} - R$ {:.2}",
            view.product.name,
            view.quantity,
            view.subtotal()
        );
    }

    format!(
        "🛍️ NOVO PEDIDO - {store_name}\n\
         👤 Cliente: {name}\n\
         📧 Email: {email}\n\
         📱 Telefone: {phone}\n\
         📍 Endereço: {address}, {city} - {state} - CEP: {zip} - {country}\n\
         🛒 PRODUTOS:\n\
         {products_list}\
         💵 TOTAL: R$ {total:.2}\n\
         ---\n\
         Pedido via {store_name}",
        store_name = store_name,
        name = contact.full_name,
        email = contact.email,
        phone = contact.phone,
        address = contact.address,
        city = contact.city,
        state = contact.state,
        zip = contact.zip_code,
        country = country,
        products_list = products_list,
        total = total,
    )
}

/// Deep link that opens a WhatsApp conversation with the store number and
/// the order message prefilled.
pub fn build_checkout_link(phone_number: &str, message: &str) -> String {
    format!(
        "{}/{}?text={}",
        WA_BASE_URL,
        phone_number,
        urlencoding::encode(message)
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::dec;

    use crate::models::Product;

    use super::*;

    fn contact() -> CheckoutRequest {
        CheckoutRequest {
            full_name: "Maria Silva".to_string(),
            email: "maria@example.com".to_string(),
            phone: "(11) 98888-7777".to_string(),
            address: "Rua das Flores, 100".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            zip_code: "01000-000".to_string(),
            country: None,
        }
    }

    fn view(name: &str, price: Decimal, quantity: i32) -> CartView {
        CartView {
            id: 1,
            quantity,
            product: Product {
                id: 1,
                name: name.to_string(),
                description: None,
                price,
                image_url: None,
                category: "geral".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        }
    }

    #[test]
    fn message_lists_every_line_with_two_decimal_money() {
        let views = vec![
            view("Caneca", dec!(10.00), 2),
            view("Garrafa", dec!(5.50), 1),
        ];

        let message = format_order_message("STG CATALOG", &contact(), &views, dec!(25.50));

        assert!(message.contains("• Caneca - Qtd: 2 - R$ 20.00"));
        assert!(message.contains("• Garrafa - Qtd: 1 - R$ 5.50"));
        assert!(message.contains("💵 TOTAL: R$ 25.50"));
    }

    #[test]
    fn message_carries_the_customer_block() {
        let message = format_order_message("STG CATALOG", &contact(), &[], Decimal::ZERO);

        assert!(message.contains("👤 Cliente: Maria Silva"));
        assert!(message.contains("📧 Email: maria@example.com"));
        assert!(message.contains("CEP: 01000-000 - Brasil"));
    }

    #[test]
    fn checkout_link_percent_encodes_the_message() {
        let link = build_checkout_link("5511999999999", "NOVO PEDIDO - R$ 25.50");

        assert!(link.starts_with("https://wa.me/5511999999999?text="));
        assert!(!link.contains(' '));
        assert!(link.contains("NOVO%20PEDIDO"));
    }
}
