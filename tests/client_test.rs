mod common;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_test::{assert_err, assert_ok};
use walkin_backend::{
    client::{ApiClient, ClientError},
    config::Config,
    database::Store,
    dto::{
        auth_dto::RegisterPayload,
        drive_dto::{CreateDrivePayload, DriveListQuery, UpdateDrivePayload},
        user_dto::ProfileFields,
    },
    models::{drive::Location, user::UserKind},
    routes, AppState,
};

use common::{RecordingMailer, JWT_SECRET};

async fn spawn_server() -> (String, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::new(&Config::for_local(JWT_SECRET), Store::memory(), mailer.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, routes::router(state)).await.unwrap();
    });
    (format!("http://{}/api", addr), mailer)
}

fn register_payload(kind: UserKind, email: &str, profile: ProfileFields) -> RegisterPayload {
    RegisterPayload {
        user_type: kind,
        email: email.into(),
        password: "secret123".into(),
        profile,
    }
}

fn drive_payload(title: &str) -> CreateDrivePayload {
    CreateDrivePayload {
        title: title.into(),
        description: Some("Bring two copies of your resume".into()),
        requirements: None,
        location: Location {
            address: "7 Anna Salai".into(),
            city: "Chennai".into(),
            state: Some("Tamil Nadu".into()),
            pincode: Some("600002".into()),
            coordinates: None,
        },
        date: chrono::Utc::now() + chrono::Duration::days(5),
        start_time: "09:00".into(),
        end_time: "15:00".into(),
        job_categories: vec!["Support".into()],
        specific_skills: vec![],
        experience_level: vec!["fresher".into()],
        status: None,
        max_candidates: Some(50),
    }
}

#[tokio::test]
async fn client_drives_the_whole_surface() {
    let (base_url, mailer) = spawn_server().await;

    let company = ApiClient::new(&base_url).unwrap();
    let session = assert_ok!(
        company
            .register(&register_payload(
                UserKind::Company,
                "hr@acme.example",
                ProfileFields {
                    company_name: Some("Acme".into()),
                    ..Default::default()
                },
            ))
            .await
    );
    assert_eq!(company.token().await, Some(session.token));

    let drive = assert_ok!(company.create_drive(&drive_payload("Support walk-in")).await);
    assert_eq!(drive.max_candidates, Some(50));

    let renamed = assert_ok!(
        company
            .update_drive(
                drive.id,
                &UpdateDrivePayload {
                    title: Some("Support walk-in (day 2)".into()),
                    ..Default::default()
                },
            )
            .await
    );
    assert_eq!(renamed.title, "Support walk-in (day 2)");

    let candidate = ApiClient::new(&base_url).unwrap();
    assert_ok!(
        candidate
            .register(&register_payload(
                UserKind::Candidate,
                "ravi@example.com",
                ProfileFields {
                    full_name: Some("Ravi K".into()),
                    ..Default::default()
                },
            ))
            .await
    );

    let listing = assert_ok!(
        candidate
            .list_drives(&DriveListQuery {
                city: Some("chen".into()),
                ..Default::default()
            })
            .await
    );
    assert_eq!(listing.total, 1);
    assert_eq!(listing.drives[0].id, drive.id);

    assert!(!candidate.check_interest(drive.id).await.unwrap());
    assert_ok!(candidate.express_interest(drive.id).await);
    assert!(candidate.check_interest(drive.id).await.unwrap());

    match candidate.express_interest(drive.id).await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, reqwest::StatusCode::CONFLICT);
            assert_eq!(message, "Already expressed interest");
        }
        other => panic!("expected conflict, got {:?}", other.map(|i| i.id)),
    }

    let mine = assert_ok!(candidate.my_interests().await);
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].drive.current_interested, 1);

    let applicants = assert_ok!(company.drive_candidates(drive.id).await);
    assert_eq!(applicants[0].candidate.full_name.as_deref(), Some("Ravi K"));

    let owned = assert_ok!(company.my_drives().await);
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].current_interested, 1);

    assert_ok!(candidate.withdraw_interest(drive.id).await);
    let fetched = assert_ok!(candidate.get_drive(drive.id).await);
    assert_eq!(fetched.current_interested, 0);
    assert_eq!(
        fetched.company.and_then(|c| c.company_name).as_deref(),
        Some("Acme")
    );

    assert_err!(company.express_interest(drive.id).await);

    let me = assert_ok!(candidate.profile().await);
    assert_eq!(me.email, "ravi@example.com");
    let updated = assert_ok!(
        candidate
            .update_profile(&ProfileFields {
                location: Some("Madurai".into()),
                ..Default::default()
            })
            .await
    );
    assert_eq!(updated.profile.location.as_deref(), Some("Madurai"));

    assert_ok!(candidate.forgot_password("ravi@example.com").await);
    let token = mailer.last_token_for("ravi@example.com").unwrap();
    let check = assert_ok!(candidate.verify_reset_token(&token).await);
    assert!(check.valid);
    assert_eq!(check.email.as_deref(), Some("ravi@example.com"));

    assert_ok!(candidate.reset_password(&token, "another-pass").await);
    let check = assert_ok!(candidate.verify_reset_token(&token).await);
    assert!(!check.valid);

    let fresh = ApiClient::new(&base_url).unwrap();
    assert_err!(fresh.login("ravi@example.com", "secret123").await);
    assert_ok!(fresh.login("ravi@example.com", "another-pass").await);
    assert!(fresh.token().await.is_some());
}

#[tokio::test]
async fn anonymous_client_gets_unauthorized() {
    let (base_url, _) = spawn_server().await;
    let client = ApiClient::new(base_url).unwrap();

    match client.my_drives().await {
        Err(ClientError::Api { status, .. }) => {
            assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED)
        }
        other => panic!("expected 401, got {:?}", other.map(|d| d.len())),
    }
}
