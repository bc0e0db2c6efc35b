use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension};
use uuid::Uuid;

use crate::{
    dto::{
        auth_dto::MessageResponse,
        interest_dto::{CheckInterestResponse, InterestResponse},
    },
    error::Result,
    extract::{Json, Path},
    models::user::Identity,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/interest/{driveId}",
    params(
        ("driveId" = Uuid, Path, description = "Drive ID")
    ),
    responses(
        (status = 201, description = "Interest recorded", body = Json<InterestResponse>),
        (status = 403, description = "Caller is not a candidate"),
        (status = 404, description = "Drive missing, closed or past"),
        (status = 409, description = "Already expressed interest")
    )
)]
#[axum::debug_handler]
pub async fn express_interest(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(drive_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let interest = state.interest_service.express(identity, drive_id).await?;
    Ok((StatusCode::CREATED, Json(InterestResponse::from(interest))))
}

#[utoipa::path(
    delete,
    path = "/api/interest/{driveId}",
    params(
        ("driveId" = Uuid, Path, description = "Drive ID")
    ),
    responses(
        (status = 200, description = "Interest withdrawn", body = Json<MessageResponse>),
        (status = 404, description = "No active interest for this drive")
    )
)]
#[axum::debug_handler]
pub async fn withdraw_interest(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(drive_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.interest_service.withdraw(identity, drive_id).await?;
    Ok(Json(MessageResponse::new("Interest withdrawn successfully")))
}

#[utoipa::path(
    get,
    path = "/api/interest/my-interests",
    responses(
        (status = 200, description = "Caller's interests with drive details", body = Json<Vec<InterestWithDrive>>),
        (status = 403, description = "Caller is not a candidate")
    )
)]
#[axum::debug_handler]
pub async fn my_interests(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse> {
    let interests = state.interest_service.my_interests(identity).await?;
    Ok(Json(interests))
}

#[utoipa::path(
    get,
    path = "/api/interest/drive/{driveId}/candidates",
    params(
        ("driveId" = Uuid, Path, description = "Drive ID")
    ),
    responses(
        (status = 200, description = "Interested candidates, newest first", body = Json<Vec<InterestWithCandidate>>),
        (status = 403, description = "Caller is not a company"),
        (status = 404, description = "Drive not found or not owned by caller")
    )
)]
#[axum::debug_handler]
pub async fn drive_candidates(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(drive_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let candidates = state
        .interest_service
        .drive_candidates(identity, drive_id)
        .await?;
    Ok(Json(candidates))
}

#[utoipa::path(
    get,
    path = "/api/interest/check/{driveId}",
    params(
        ("driveId" = Uuid, Path, description = "Drive ID")
    ),
    responses(
        (status = 200, description = "Whether the caller is interested", body = Json<CheckInterestResponse>),
        (status = 403, description = "Caller is not a candidate")
    )
)]
#[axum::debug_handler]
pub async fn check_interest(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(drive_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let has_interest = state
        .interest_service
        .check_interest(identity, drive_id)
        .await?;
    Ok(Json(CheckInterestResponse { has_interest }))
}
