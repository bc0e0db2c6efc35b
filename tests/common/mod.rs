#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use walkin_backend::{
    config::Config,
    database::{
        pool::{create_pool, run_migrations},
        Store,
    },
    error::Result,
    routes,
    services::mail_service::Mailer,
    AppState,
};

pub const JWT_SECRET: &str = "test_secret_key";

/// Keeps every reset token it is asked to deliver.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn last_token_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, token)| token.clone())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_password_reset(&self, to: &str, token: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), token.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Store,
    pub mailer: Arc<RecordingMailer>,
}

pub fn app() -> TestApp {
    app_with_store(Store::memory())
}

pub fn app_with_store(store: Store) -> TestApp {
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::new(&Config::for_local(JWT_SECRET), store.clone(), mailer.clone());
    TestApp {
        router: routes::router(state),
        store,
        mailer,
    }
}

/// Postgres store with migrations applied, or `None` when `DATABASE_URL`
/// is not set.
pub async fn postgres_store() -> Option<Store> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let config = Config::for_local(JWT_SECRET);
    let pool = create_pool(&config, &database_url).await.expect("pool");
    run_migrations(&pool).await.expect("migrations");
    Some(Store::postgres(pool))
}

/// Suffix that keeps rows from different runs apart in a shared database.
pub fn unique(prefix: &str) -> String {
    format!("{}{}", prefix, uuid::Uuid::new_v4().simple())
}

impl TestApp {
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<JsonValue>,
    ) -> (StatusCode, JsonValue) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
        };
        (status, json)
    }

    /// Registers an account and returns `(token, user id)`.
    pub async fn register(&self, user_type: &str, email: &str, extra: JsonValue) -> (String, String) {
        let mut body = json!({
            "userType": user_type,
            "email": email,
            "password": "secret123",
        });
        if let (Some(target), Some(fields)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in fields {
                target.insert(k.clone(), v.clone());
            }
        }
        let (status, json) = self
            .call(Method::POST, "/api/auth/register", None, Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", json);
        (
            json["token"].as_str().unwrap().to_string(),
            json["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    pub async fn create_drive(&self, token: &str, body: JsonValue) -> JsonValue {
        let (status, json) = self
            .call(Method::POST, "/api/drives", Some(token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create drive failed: {}", json);
        json
    }
}

pub fn drive_body(title: &str, city: &str, days_ahead: i64) -> JsonValue {
    let date = chrono::Utc::now() + chrono::Duration::days(days_ahead);
    json!({
        "title": title,
        "description": "Walk-in interviews for freshers",
        "location": { "address": "42 Residency Road", "city": city },
        "date": date.to_rfc3339(),
        "startTime": "10:00",
        "endTime": "16:00",
        "jobCategories": ["IT"],
        "specificSkills": ["rust", "sql"],
        "experienceLevel": ["fresher"],
    })
}
