use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension};
use uuid::Uuid;

use crate::{
    dto::drive_dto::{
        CreateDrivePayload, DriveListQuery, DriveListResponse, DriveResponse, UpdateDrivePayload,
    },
    error::Result,
    extract::{Json, Path, Query},
    models::user::Identity,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/drives",
    params(
        ("city" = Option<String>, Query, description = "Case-insensitive city substring"),
        ("jobCategories" = Option<String>, Query, description = "Comma separated categories"),
        ("skills" = Option<String>, Query, description = "Comma separated skills"),
        ("experience" = Option<String>, Query, description = "Comma separated experience levels"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Open drives, earliest first", body = Json<DriveListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_drives(
    State(state): State<AppState>,
    Query(query): Query<DriveListQuery>,
) -> Result<impl IntoResponse> {
    let listing = state.drive_service.list(query).await?;
    Ok(Json(DriveListResponse::from(listing)))
}

#[utoipa::path(
    get,
    path = "/api/drives/{id}",
    params(
        ("id" = Uuid, Path, description = "Drive ID")
    ),
    responses(
        (status = 200, description = "Drive found", body = Json<DriveResponse>),
        (status = 404, description = "Drive not found")
    )
)]
#[axum::debug_handler]
pub async fn get_drive(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let drive = state.drive_service.get_by_id(id).await?;
    Ok(Json(drive))
}

#[utoipa::path(
    post,
    path = "/api/drives",
    request_body = CreateDrivePayload,
    responses(
        (status = 201, description = "Drive created", body = Json<DriveResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not a company")
    )
)]
#[axum::debug_handler]
pub async fn create_drive(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateDrivePayload>,
) -> Result<impl IntoResponse> {
    let drive = state.drive_service.create(identity, payload).await?;
    Ok((StatusCode::CREATED, Json(DriveResponse::from(drive))))
}

#[utoipa::path(
    put,
    path = "/api/drives/{id}",
    params(
        ("id" = Uuid, Path, description = "Drive ID")
    ),
    request_body = UpdateDrivePayload,
    responses(
        (status = 200, description = "Drive updated", body = Json<DriveResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Drive not found or not owned by caller")
    )
)]
#[axum::debug_handler]
pub async fn update_drive(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDrivePayload>,
) -> Result<impl IntoResponse> {
    let drive = state.drive_service.update(identity, id, payload).await?;
    Ok(Json(DriveResponse::from(drive)))
}

#[utoipa::path(
    get,
    path = "/api/drives/company/my-drives",
    responses(
        (status = 200, description = "Drives owned by the caller, newest first", body = Json<Vec<DriveResponse>>),
        (status = 403, description = "Caller is not a company")
    )
)]
#[axum::debug_handler]
pub async fn my_drives(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse> {
    let drives = state.drive_service.list_mine(identity).await?;
    let items: Vec<DriveResponse> = drives.into_iter().map(DriveResponse::from).collect();
    Ok(Json(items))
}
