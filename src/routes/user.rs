use axum::{extract::State, response::IntoResponse, Extension};

use crate::{
    dto::user_dto::ProfileFields,
    error::Result,
    extract::Json,
    models::user::Identity,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/user/profile",
    responses(
        (status = 200, description = "Caller's account", body = Json<UserResponse>),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.profile(identity).await?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/api/user/profile",
    request_body = ProfileFields,
    responses(
        (status = 200, description = "Profile updated", body = Json<UserResponse>),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(fields): Json<ProfileFields>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.update_profile(identity, fields).await?;
    Ok(Json(user))
}
