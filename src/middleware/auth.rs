use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::Error, models::user::Identity, AppState};

/// Rejects the request with 401 unless it carries a valid bearer token. On
/// success the decoded `Identity` is available to handlers as an extension.
pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return Error::Unauthorized("No token, authorization denied".into()).into_response();
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Error::Unauthorized("Malformed authorization header".into()).into_response();
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Error::Unauthorized("Unsupported authorization scheme".into()).into_response();
    };

    match state.jwt.verify(token.trim()) {
        Ok(claims) => {
            req.extensions_mut()
                .insert(Identity::new(claims.sub, claims.user_type));
            next.run(req).await
        }
        Err(err) => {
            tracing::debug!(error = %err, "rejected bearer token");
            Error::Unauthorized("Token is not valid".into()).into_response()
        }
    }
}
