use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::user_dto::{ProfileFields, UserResponse};
use crate::models::user::UserKind;

pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account with this email exists, you will receive password reset instructions.";
pub const RESET_PASSWORD_MESSAGE: &str =
    "Password has been successfully reset. You can now log in with your new password.";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub user_type: UserKind,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordPayload {
    #[validate(required(message = "Email is required"), length(min = 1))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    #[validate(required(message = "Token is required"), length(min = 1))]
    pub token: Option<String>,
    #[validate(
        required(message = "New password is required"),
        length(min = 6, message = "Password must be at least 6 characters long")
    )]
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResetTokenResponse {
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
