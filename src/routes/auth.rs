use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    dto::auth_dto::{
        ForgotPasswordPayload, LoginPayload, RegisterPayload, ResetPasswordPayload,
        VerifyResetTokenResponse,
    },
    error::Result,
    extract::{Json, Path},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Account created", body = Json<AuthResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Email already registered")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    let session = state.auth_service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Logged in", body = Json<AuthResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    let session = state.auth_service.login(payload).await?;
    Ok(Json(session))
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordPayload,
    responses(
        (status = 200, description = "Generic acknowledgement", body = Json<MessageResponse>),
        (status = 400, description = "Email missing"),
        (status = 500, description = "Reset email could not be sent")
    )
)]
#[axum::debug_handler]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Result<impl IntoResponse> {
    let message = state.auth_service.forgot_password(payload).await?;
    Ok(Json(message))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Password replaced", body = Json<MessageResponse>),
        (status = 400, description = "Invalid payload or invalid/expired token")
    )
)]
#[axum::debug_handler]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<impl IntoResponse> {
    let message = state.auth_service.reset_password(payload).await?;
    Ok(Json(message))
}

#[utoipa::path(
    get,
    path = "/api/auth/verify-reset-token/{token}",
    params(
        ("token" = String, Path, description = "Password reset token")
    ),
    responses(
        (status = 200, description = "Token is valid", body = Json<VerifyResetTokenResponse>),
        (status = 400, description = "Token is invalid or expired", body = Json<VerifyResetTokenResponse>)
    )
)]
#[axum::debug_handler]
pub async fn verify_reset_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse> {
    let response = match state.auth_service.verify_reset_token(&token).await? {
        Some(email) => (
            StatusCode::OK,
            Json(VerifyResetTokenResponse {
                valid: true,
                message: "Token is valid".into(),
                email: Some(email),
            }),
        ),
        None => (
            StatusCode::BAD_REQUEST,
            Json(VerifyResetTokenResponse {
                valid: false,
                message: "Invalid or expired reset token".into(),
                email: None,
            }),
        ),
    };
    Ok(response)
}
