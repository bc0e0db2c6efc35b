use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use walkin_backend::{
    config::Config,
    database::{
        pool::{create_pool, run_migrations},
        Store,
    },
    routes,
    services::mail_service::HttpMailer,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_json);

    let store = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = create_pool(&config, database_url).await?;
            run_migrations(&pool).await?;
            info!("Connected to Postgres, migrations applied");
            Store::postgres(pool)
        }
        None => {
            warn!("DATABASE_URL not set; using the in-memory store, data will not survive restarts");
            Store::memory()
        }
    };

    let mailer = Arc::new(HttpMailer::new(&config)?);
    let app_state = AppState::new(&config, store, mailer);
    let app = routes::router(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("walkin_backend=info,tower_http=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
