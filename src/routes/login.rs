use axum::{Json, extract::State};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{AuthResponse, LoginRequest},
    queries::user_queries,
    utils::jwt,
};

pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = user_queries::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Email ou senha inválidos".to_string()))?;

    let is_valid = bcrypt::verify(&payload.password, &user.password)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {}", e)))?;

    if !is_valid {
        return Err(AppError::Unauthorized("Email ou senha inválidos".to_string()));
    }

    let token = jwt::generate_token(user.id, &user.email, &user.name)?;

    Ok(Json(AuthResponse { token }))
}
