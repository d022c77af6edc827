use axum::{Extension, Json, extract::State};

use crate::{
    AppState,
    error::{AppError, Result},
    models::ProfileResponse,
    queries::user_queries,
    utils::{extractors::extract_user_id, jwt::Claims},
};

/// Account info for the current session, as shown on the profile view.
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ProfileResponse>> {
    let user_id = extract_user_id(&claims)?;

    let user = user_queries::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuário não encontrado".to_string()))?;

    Ok(Json(ProfileResponse::from(user)))
}
