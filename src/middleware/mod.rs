use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::AppError;

/// Verifies the bearer token and makes the session claims available to
/// handlers as a request extension. No valid token means no session.
pub async fn auth_middleware(mut req: Request, next: Next) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Autenticação necessária".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Formato de token inválido".to_string()))?;

    let claims = crate::utils::jwt::verify_token(token)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
