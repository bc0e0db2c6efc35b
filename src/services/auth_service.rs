use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::database::{Insertion, UserRepository};
use crate::dto::auth_dto::{
    AuthResponse, ForgotPasswordPayload, LoginPayload, MessageResponse, RegisterPayload,
    ResetPasswordPayload, FORGOT_PASSWORD_MESSAGE, RESET_PASSWORD_MESSAGE,
};
use crate::dto::user_dto::UserResponse;
use crate::error::{Error, Result};
use crate::models::user::{NewUser, User};
use crate::services::mail_service::Mailer;
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::jwt::JwtKeys;
use crate::utils::time::{now, reset_token_expiry};
use crate::utils::token::generate_reset_token;

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: JwtKeys,
    mailer: Arc<dyn Mailer>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtKeys, mailer: Arc<dyn Mailer>) -> Self {
        Self { users, jwt, mailer }
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<AuthResponse> {
        payload.validate()?;

        if self.users.find_by_email(&payload.email).await?.is_some() {
            return Err(Error::Conflict("User already exists".into()));
        }

        let password_hash = hash_password(payload.password).await?;
        let new_user = NewUser {
            kind: payload.user_type,
            email: payload.email,
            password_hash,
            profile: payload.profile.into_profile(),
        };

        let user = match self.users.insert(new_user).await? {
            Insertion::Created(user) => user,
            Insertion::Duplicate => return Err(Error::Conflict("User already exists".into())),
        };

        info!(user_id = %user.id, kind = %user.kind, "registered new account");
        self.session_for(user)
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, payload: LoginPayload) -> Result<AuthResponse> {
        let Some(user) = self.users.find_by_email(&payload.email).await? else {
            return Err(Error::InvalidCredentials);
        };

        if !verify_password(payload.password, user.password_hash.clone()).await? {
            return Err(Error::InvalidCredentials);
        }

        self.session_for(user)
    }

    /// Answers with the same message whether or not the account exists. Only
    /// a failed email dispatch surfaces, after the issued token is cleared.
    pub async fn forgot_password(&self, payload: ForgotPasswordPayload) -> Result<MessageResponse> {
        payload.validate()?;
        let email = payload.email.unwrap_or_default();

        let Some(user) = self.users.find_by_email(&email).await? else {
            return Ok(MessageResponse::new(FORGOT_PASSWORD_MESSAGE));
        };

        let token = generate_reset_token();
        self.users
            .store_reset_token(user.id, &token, reset_token_expiry(now()))
            .await?;

        if let Err(err) = self.mailer.send_password_reset(&user.email, &token).await {
            warn!(user_id = %user.id, error = %err, "reset email failed, clearing token");
            self.users.clear_reset_token(user.id).await?;
            return Err(err);
        }

        info!(user_id = %user.id, "password reset token issued");
        Ok(MessageResponse::new(FORGOT_PASSWORD_MESSAGE))
    }

    pub async fn reset_password(&self, payload: ResetPasswordPayload) -> Result<MessageResponse> {
        payload.validate()?;
        let token = payload.token.unwrap_or_default();
        let new_password = payload.new_password.unwrap_or_default();

        // Cheap pre-check so an unknown token does not pay for a hash.
        if self.users.find_by_reset_token(&token, now()).await?.is_none() {
            return Err(Error::InvalidOrExpiredToken);
        }

        let password_hash = hash_password(new_password).await?;
        let Some(user) = self
            .users
            .consume_reset_token(&token, now(), &password_hash)
            .await?
        else {
            return Err(Error::InvalidOrExpiredToken);
        };

        info!(user_id = %user.id, "password reset completed");
        Ok(MessageResponse::new(RESET_PASSWORD_MESSAGE))
    }

    /// Email of the account holding a live token; does not consume it.
    pub async fn verify_reset_token(&self, token: &str) -> Result<Option<String>> {
        Ok(self
            .users
            .find_by_reset_token(token, now())
            .await?
            .map(|user| user.email))
    }

    fn session_for(&self, user: User) -> Result<AuthResponse> {
        let token = self.jwt.issue(user.id, user.kind)?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }
}
