pub mod auth;
pub mod drives;
pub mod health;
pub mod interest;
pub mod user;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{middleware::auth::require_bearer_auth, AppState};

/// Full HTTP surface. Public routes and bearer-protected routes are merged
/// under `/api`; the health probe sits at the root.
pub fn router(state: AppState) -> Router {
    let public_api = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .route(
            "/api/auth/verify-reset-token/:token",
            get(auth::verify_reset_token),
        )
        .route("/api/drives", get(drives::list_drives))
        .route("/api/drives/:id", get(drives::get_drive));

    let protected_api = Router::new()
        .route("/api/drives", post(drives::create_drive))
        .route("/api/drives/:id", put(drives::update_drive))
        .route("/api/drives/company/my-drives", get(drives::my_drives))
        .route(
            "/api/interest/:driveId",
            post(interest::express_interest).delete(interest::withdraw_interest),
        )
        .route("/api/interest/my-interests", get(interest::my_interests))
        .route(
            "/api/interest/drive/:driveId/candidates",
            get(interest::drive_candidates),
        )
        .route("/api/interest/check/:driveId", get(interest::check_interest))
        .route(
            "/api/user/profile",
            get(user::get_profile).put(user::update_profile),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_bearer_auth,
        ));

    Router::new()
        .route("/health", get(health::health))
        .merge(public_api)
        .merge(protected_api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
