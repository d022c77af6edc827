use axum::{Extension, Json, extract::State};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{CheckoutRequest, CheckoutResponse},
    queries::cart_queries,
    services::{cart_service, whatsapp_service},
    utils::{extractors::extract_user_id, jwt::Claims},
};

pub async fn checkout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let user_id = extract_user_id(&claims)?;

    validate_contact(&payload)?;

    let views = cart_queries::find_cart_views(&state.db, user_id).await?;

    if views.is_empty() {
        return Err(AppError::BadRequest(
            "Carrinho vazio. Adicione produtos antes de finalizar o pedido".to_string(),
        ));
    }

    let total = cart_service::compute_total(&views);

    let message = whatsapp_service::format_order_message(
        &state.whatsapp.store_name,
        &payload,
        &views,
        total,
    );
    let whatsapp_url = whatsapp_service::build_checkout_link(&state.whatsapp.phone_number, &message);

    // The order left for WhatsApp; the cart is done. Cleared only after the
    // summary was built from it.
    cart_queries::clear_cart(&state.db, user_id).await?;

    tracing::info!("Order placed by user {} with {} lines", user_id, views.len());

    Ok(Json(CheckoutResponse {
        whatsapp_url,
        message,
        total,
    }))
}

fn validate_contact(payload: &CheckoutRequest) -> Result<()> {
    let required = [
        ("nome completo", &payload.full_name),
        ("email", &payload.email),
        ("telefone", &payload.phone),
        ("endereço", &payload.address),
        ("cidade", &payload.city),
        ("estado", &payload.state),
        ("CEP", &payload.zip_code),
    ];

    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| *field)
        .collect();

    if !missing.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Preencha os campos obrigatórios: {}",
            missing.join(", ")
        )));
    }

    if !payload.email.contains('@') {
        return Err(AppError::BadRequest("Email inválido".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_request() -> CheckoutRequest {
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

    #[test]
    fn accepts_a_complete_contact() {
        assert!(validate_contact(&filled_request()).is_ok());
    }

    #[test]
    fn lists_every_missing_field() {
        let mut payload = filled_request();
        payload.phone = String::new();
        payload.zip_code = "  ".to_string();

        let error = validate_contact(&payload).unwrap_err();

        match error {
            AppError::BadRequest(msg) => {
                assert!(msg.contains("telefone"));
                assert!(msg.contains("CEP"));
                assert!(!msg.contains("cidade"));
            }
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn rejects_a_malformed_email() {
        let mut payload = filled_request();
        payload.email = "maria.example.com".to_string();

        assert!(validate_contact(&payload).is_err());
    }
}
