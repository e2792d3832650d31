//! Handlers for the `/auth` resource: account lifecycle for site owners.
//!
//! Access tokens are stateless JWTs, so logout only acknowledges the request;
//! the client discards its token.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;
use wedsite_core::error::CoreError;
use wedsite_core::roles::ROLE_CUSTOMER;
use wedsite_core::rsvp::field_errors;
use wedsite_db::models::admin_panel::AdminPanelGrant;
use wedsite_db::models::user::{CreateUser, ManagementUser, UserResponse};
use wedsite_db::repositories::{AdminPanelRepo, UserRepo};
use wedsite_notify::email::{password_reset_email, verification_email};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::auth::tokens::{generate_token, hash_token};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rate_limit::{AuthRateLimit, EmailRateLimit};
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Lifetime of a password reset link.
const RESET_TOKEN_TTL_MINS: i64 = 60;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/verify-email`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Creates a customer account and emails a verification link.
pub async fn register(
    State(state): State<AppState>,
    _limit: AuthRateLimit,
    Json(mut input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.email = input.email.trim().to_lowercase();
    input.first_name = input.first_name.trim().to_string();
    input.last_name = input.last_name.trim().to_string();

    if let Err(errors) = input.validate() {
        let mut fields = field_errors(&errors);
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        return Err(AppError::Core(CoreError::InvalidFields(fields)));
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    if UserRepo::find_by_email(&state.pool, &input.email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let (verification_token, verification_hash) = generate_token();

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
            role: ROLE_CUSTOMER.to_string(),
            verification_token_hash: Some(verification_hash),
        },
    )
    .await?;
    tracing::info!(user_id = user.id, "Account registered");

    let link = format!(
        "{}/verify-email?token={verification_token}",
        state.config.public_base_url
    );
    state.send_email_in_background(verification_email(&user.email, &link));

    let response = auth_response(&state, &user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    _limit: AuthRateLimit,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()));

    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: bad password");
        return Err(invalid());
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Account is deactivated".into(),
        )));
    }

    UserRepo::record_login(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, "Login succeeded");

    Ok(Json(auth_response(&state, &user)?))
}

/// POST /api/auth/verify-email
pub async fn verify_email(
    State(state): State<AppState>,
    _limit: AuthRateLimit,
    Json(input): Json<TokenRequest>,
) -> AppResult<Json<MessageResponse>> {
    let user = UserRepo::verify_email(&state.pool, &hash_token(&input.token))
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Invalid or already used verification token".into(),
            ))
        })?;
    tracing::info!(user_id = user.id, "Email verified");

    Ok(Json(MessageResponse {
        message: "Email verified",
    }))
}

/// POST /api/auth/forgot-password
///
/// Always answers with the same message so account existence is not revealed.
pub async fn forgot_password(
    State(state): State<AppState>,
    _limit: EmailRateLimit,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let user = UserRepo::find_by_email(&state.pool, input.email.trim()).await?;

    if let Some(user) = user.filter(|u| u.is_active) {
        let (token, token_hash) = generate_token();
        let expires_at = Utc::now() + chrono::Duration::minutes(RESET_TOKEN_TTL_MINS);
        UserRepo::set_password_reset(&state.pool, user.id, &token_hash, expires_at).await?;

        let link = format!("{}/reset-password?token={token}", state.config.public_base_url);
        state.send_email_in_background(password_reset_email(&user.email, &link));
        tracing::info!(user_id = user.id, "Password reset requested");
    }

    Ok(Json(MessageResponse {
        message: "If an account exists for this email, a reset link has been sent",
    }))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    _limit: AuthRateLimit,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::reset_password(&state.pool, &hash_token(&input.token), &password_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation("Invalid or expired reset token".into()))
        })?;
    tracing::info!(user_id = user.id, "Password reset completed");

    Ok(Json(MessageResponse {
        message: "Password has been reset",
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = active_user(&state, &auth_user).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// POST /api/auth/logout
///
/// Returns 204. The token stays valid until it expires.
pub async fn logout(auth_user: AuthUser) -> StatusCode {
    tracing::debug!(user_id = auth_user.user_id, "Logout");
    StatusCode::NO_CONTENT
}

/// GET /api/auth/admin-panels
///
/// Lists the caller's admin-panel grants with the status of their orders.
pub async fn admin_panels(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<AdminPanelGrant>>>> {
    let user = active_user(&state, &auth_user).await?;
    let grants = AdminPanelRepo::list_for_user(&state.pool, user.id).await?;
    Ok(Json(DataResponse { data: grants }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn active_user(state: &AppState, auth_user: &AuthUser) -> AppResult<ManagementUser> {
    UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                wedsite_core::entitlement::MSG_USER_INACTIVE.into(),
            ))
        })
}

fn auth_response(state: &AppState, user: &ManagementUser) -> AppResult<AuthResponse> {
    let token = generate_access_token(user.id, &user.email, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(AuthResponse {
        token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: UserResponse::from(user),
    })
}
