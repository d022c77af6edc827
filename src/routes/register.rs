use axum::{Json, extract::State};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{AuthResponse, RegisterRequest},
    queries::user_queries,
    utils::jwt,
};

pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    validate_registration(&payload)?;

    if user_queries::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email já cadastrado".to_string()));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    let user =
        user_queries::create_user(&state.db, &payload.email, &payload.name, &password_hash).await?;

    let token = jwt::generate_token(user.id, &user.email, &user.name)?;

    Ok(Json(AuthResponse { token }))
}

fn validate_registration(payload: &RegisterRequest) -> Result<()> {
    if payload.email.is_empty() || !payload.email.contains('@') {
        return Err(AppError::BadRequest("Email inválido".to_string()));
    }

    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "O nome não pode ficar em branco".to_string(),
        ));
    }

    if payload.password.len() < 8 {
        return Err(AppError::BadRequest(
            "A senha deve ter pelo menos 8 caracteres".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, name: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            name: name.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn rejects_email_without_at_sign() {
        let result = validate_registration(&request("maria.example.com", "Maria", "senha-forte"));

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn rejects_blank_name_and_short_password() {
        assert!(validate_registration(&request("a@b.com", "   ", "senha-forte")).is_err());
        assert!(validate_registration(&request("a@b.com", "Maria", "curta")).is_err());
    }

    #[test]
    fn accepts_a_well_formed_registration() {
        assert!(validate_registration(&request("maria@example.com", "Maria", "senha-forte")).is_ok());
    }
}
