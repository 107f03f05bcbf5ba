use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio::net::TcpListener;

use crate::server::{
    config::Config, error::Error, model::app::AppState, router, service::image::ImageStore,
};

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Create the media directory uploaded images are written to
pub async fn prepare_media_root(config: &Config) -> Result<ImageStore, Error> {
    tokio::fs::create_dir_all(&config.media_root).await?;

    Ok(ImageStore::new(config.media_root.clone(), config.media_url.clone()))
}

/// Serve the API until the process receives Ctrl+C
pub async fn serve(config: &Config, db: DatabaseConnection) -> Result<(), Error> {
    let images = prepare_media_root(config).await?;
    let state = AppState {
        db,
        images,
        page_size: config.page_size,
        max_page_size: config.max_page_size,
    };

    let listener = TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Starting server on {}", config.bind_address);

    axum::serve(listener, router::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
}
