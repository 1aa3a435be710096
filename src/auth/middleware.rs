//! Authentication Middleware
//! Mission: gate protected endpoints behind bearer-token validation

use crate::auth::api::AuthState;
use crate::auth::models::CurrentUser;
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Auth middleware that validates the bearer token and loads the caller.
///
/// On success the user (password hash excluded) is attached to request
/// extensions for downstream handlers.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or(ApiError::Unauthenticated("Authorization required"))?
        .to_string();

    let claims = state
        .jwt_handler
        .verify(&token)
        .map_err(|_| ApiError::Unauthenticated("Invalid or expired token"))?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthenticated("Invalid or expired token"))?;

    let user = state
        .user_store
        .find_by_id(&user_id)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::Unauthenticated("User not found"))?;

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        full_name: user.full_name,
        email: user.email,
    });

    Ok(next.run(req).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header value
fn bearer_token(value: &str) -> Option<&str> {
    value.strip_prefix("Bearer ")
}
