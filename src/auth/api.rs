//! Authentication API Endpoints
//! Mission: registration, login, and profile management

use crate::auth::{
    jwt::JwtHandler,
    models::{
        AuthResponse, CurrentUser, LoginRequest, RegisterRequest, UpdateProfileRequest,
        UserResponse, UserSummary,
    },
    user_store::UserStore,
};
use crate::error::ApiError;
use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 8;

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub user_store: Arc<UserStore>,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AuthState {
    pub fn new(user_store: Arc<UserStore>, jwt_handler: Arc<JwtHandler>) -> Self {
        Self {
            user_store,
            jwt_handler,
        }
    }
}

/// Register endpoint - POST /api/register
pub async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let full_name = payload.full_name.as_deref().unwrap_or("").trim();
    let email = payload.email.as_deref().unwrap_or("").trim();
    let password = payload.password.as_deref().unwrap_or("");

    if full_name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ApiError::Validation("All fields are required"));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters",
        ));
    }

    let existing = state
        .user_store
        .find_by_email(email)
        .map_err(ApiError::internal)?;
    if existing.is_some() {
        return Err(ApiError::Conflict("User already exists"));
    }

    let user = state
        .user_store
        .create_user(full_name, email, password)
        .map_err(ApiError::internal)?;

    let (token, _expires_in) = state
        .jwt_handler
        .issue(&user.id)
        .map_err(ApiError::internal)?;

    info!("Registered user: {}", user.email);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registered successfully".to_string(),
            token,
            user: UserSummary::from_user(&user),
        }),
    ))
}

/// Login endpoint - POST /api/login
pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = payload.email.as_deref().unwrap_or("");
    let password = payload.password.as_deref().unwrap_or("");

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::Validation("Email and password required"));
    }

    // Identical error for unknown email and wrong password (enumeration resistance)
    let valid = state
        .user_store
        .verify_password(email, password)
        .map_err(ApiError::internal)?;

    if !valid {
        warn!("Failed login attempt: {}", email);
        return Err(ApiError::Unauthenticated("Invalid credentials"));
    }

    let user = state
        .user_store
        .find_by_email(email)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::Unauthenticated("Invalid credentials"))?;

    let (token, _expires_in) = state
        .jwt_handler
        .issue(&user.id)
        .map_err(ApiError::internal)?;

    info!("Login successful: {}", user.email);

    Ok(Json(AuthResponse {
        message: "Login success".to_string(),
        token,
        user: UserSummary::from_user(&user),
    }))
}

/// Current user endpoint - GET /api/me
pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(UserResponse {
        message: None,
        user: UserSummary::from_current(&user),
    })
}

/// Profile update endpoint - PUT /api/profile
///
/// Each field updates independently when present; null counts as absent.
/// An empty-string password is ignored rather than rejected.
pub async fn update_profile(
    State(state): State<AuthState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let mut user = state
        .user_store
        .find_by_id(&current.id)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("User not found"))?;

    if let Some(full_name) = payload.full_name {
        user.full_name = full_name;
    }

    if let Some(email) = payload.email {
        let taken = state
            .user_store
            .email_taken_by_other(&email, &user.id)
            .map_err(ApiError::internal)?;
        if taken {
            return Err(ApiError::Conflict("Email already in use"));
        }
        user.email = email;
    }

    if let Some(password) = payload.password {
        if !password.is_empty() {
            if password.len() < MIN_PASSWORD_LEN {
                return Err(ApiError::Validation(
                    "Password must be at least 8 characters",
                ));
            }
            user.password_hash = UserStore::hash_password(&password).map_err(ApiError::internal)?;
        }
    }

    user.updated_at = Utc::now().to_rfc3339();
    state
        .user_store
        .update_user(&user)
        .map_err(ApiError::internal)?;

    info!("Profile updated: {}", user.id);

    Ok(Json(UserResponse {
        message: Some("Profile updated".to_string()),
        user: UserSummary::from_user(&user),
    }))
}
