//! Typed HTTP client for the `/api` surface, as used by the mobile app.
//!
//! One instance holds the base URL and, after `login` or `register`, the
//! bearer token that is attached to every later request.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dto::{
    auth_dto::{
        AuthResponse, ForgotPasswordPayload, LoginPayload, MessageResponse, RegisterPayload,
        ResetPasswordPayload, VerifyResetTokenResponse,
    },
    drive_dto::{
        CreateDrivePayload, DriveListQuery, DriveListResponse, DriveResponse, UpdateDrivePayload,
    },
    interest_dto::{CheckInterestResponse, InterestResponse, InterestWithCandidate, InterestWithDrive},
    user_dto::{ProfileFields, UserResponse},
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: StatusCode, message: String },
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

pub struct ApiClient {
    http: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// `base_url` is the server root including `/api`, e.g.
    /// `http://localhost:5000/api`.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn register(&self, payload: &RegisterPayload) -> ClientResult<AuthResponse> {
        let session: AuthResponse = self
            .send(self.request(Method::POST, "/auth/register").await.json(payload))
            .await?;
        self.set_token(Some(session.token.clone())).await;
        Ok(session)
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let payload = LoginPayload {
            email: email.to_string(),
            password: password.to_string(),
        };
        let session: AuthResponse = self
            .send(self.request(Method::POST, "/auth/login").await.json(&payload))
            .await?;
        self.set_token(Some(session.token.clone())).await;
        Ok(session)
    }

    pub async fn forgot_password(&self, email: &str) -> ClientResult<MessageResponse> {
        let payload = ForgotPasswordPayload {
            email: Some(email.to_string()),
        };
        self.send(
            self.request(Method::POST, "/auth/forgot-password")
                .await
                .json(&payload),
        )
        .await
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> ClientResult<MessageResponse> {
        let payload = ResetPasswordPayload {
            token: Some(token.to_string()),
            new_password: Some(new_password.to_string()),
        };
        self.send(
            self.request(Method::POST, "/auth/reset-password")
                .await
                .json(&payload),
        )
        .await
    }

    /// An invalid token is reported as `valid: false`, not as an error.
    pub async fn verify_reset_token(&self, token: &str) -> ClientResult<VerifyResetTokenResponse> {
        let path = format!("/auth/verify-reset-token/{}", token);
        let response = self.request(Method::GET, &path).await.send().await?;
        if response.status() == StatusCode::BAD_REQUEST {
            return Ok(response.json().await?);
        }
        decode(response).await
    }

    pub async fn list_drives(&self, query: &DriveListQuery) -> ClientResult<DriveListResponse> {
        self.send(self.request(Method::GET, "/drives").await.query(query))
            .await
    }

    pub async fn get_drive(&self, id: Uuid) -> ClientResult<DriveResponse> {
        self.send(self.request(Method::GET, &format!("/drives/{}", id)).await)
            .await
    }

    pub async fn create_drive(&self, payload: &CreateDrivePayload) -> ClientResult<DriveResponse> {
        self.send(self.request(Method::POST, "/drives").await.json(payload))
            .await
    }

    pub async fn update_drive(
        &self,
        id: Uuid,
        payload: &UpdateDrivePayload,
    ) -> ClientResult<DriveResponse> {
        self.send(
            self.request(Method::PUT, &format!("/drives/{}", id))
                .await
                .json(payload),
        )
        .await
    }

    pub async fn my_drives(&self) -> ClientResult<Vec<DriveResponse>> {
        self.send(self.request(Method::GET, "/drives/company/my-drives").await)
            .await
    }

    pub async fn express_interest(&self, drive_id: Uuid) -> ClientResult<InterestResponse> {
        self.send(
            self.request(Method::POST, &format!("/interest/{}", drive_id))
                .await,
        )
        .await
    }

    pub async fn withdraw_interest(&self, drive_id: Uuid) -> ClientResult<MessageResponse> {
        self.send(
            self.request(Method::DELETE, &format!("/interest/{}", drive_id))
                .await,
        )
        .await
    }

    pub async fn my_interests(&self) -> ClientResult<Vec<InterestWithDrive>> {
        self.send(self.request(Method::GET, "/interest/my-interests").await)
            .await
    }

    pub async fn drive_candidates(&self, drive_id: Uuid) -> ClientResult<Vec<InterestWithCandidate>> {
        let path = format!("/interest/drive/{}/candidates", drive_id);
        self.send(self.request(Method::GET, &path).await).await
    }

    pub async fn check_interest(&self, drive_id: Uuid) -> ClientResult<bool> {
        let path = format!("/interest/check/{}", drive_id);
        let response: CheckInterestResponse = self.send(self.request(Method::GET, &path).await).await?;
        Ok(response.has_interest)
    }

    pub async fn profile(&self) -> ClientResult<UserResponse> {
        self.send(self.request(Method::GET, "/user/profile").await)
            .await
    }

    pub async fn update_profile(&self, fields: &ProfileFields) -> ClientResult<UserResponse> {
        self.send(
            self.request(Method::PUT, "/user/profile")
                .await
                .json(fields),
        )
        .await
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        match self.token.read().await.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        decode(builder.send().await?).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body: serde_json::Value = response.json().await.unwrap_or_default();
    let message = ["error", "message"]
        .iter()
        .find_map(|key| body.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Something went wrong")
                .to_string()
        });
    Err(ClientError::Api { status, message })
}
