use std::sync::Arc;

use filedepot::auth::{AuthService, PgUserRepository};
use filedepot::files::{DiskStore, FileService};
use filedepot::{config::AppConfig, create_router, database, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filedepot=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env();
    if let Err(err) = config.validate() {
        tracing::error!("Invalid configuration: {}", err);
        std::process::exit(1);
    }

    let db = database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    database::run_migrations(&db)
        .await
        .expect("Failed to run migrations");

    let store = Arc::new(DiskStore::new(&config.upload_dir));
    store.init().await.expect("Failed to create upload directory");

    let users = Arc::new(PgUserRepository::new(db.clone()));
    let auth = Arc::new(AuthService::new(users, &config));
    let files = Arc::new(FileService::new(db, store));

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        config: Arc::new(config),
        auth,
        files,
    };

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, create_router(state))
        .await
        .expect("Server error");
}
