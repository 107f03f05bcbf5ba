use std::path::PathBuf;

use sea_orm::DatabaseConnection;

use crate::server::{
    config::{DEFAULT_MAX_PAGE_SIZE, DEFAULT_MEDIA_URL, DEFAULT_PAGE_SIZE},
    service::image::ImageStore,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub images: ImageStore,
    /// Default number of items per page when the client sends no `limit`
    pub page_size: u64,
    /// Largest `limit` a client may request
    pub max_page_size: u64,
}

/// Builds a state with default media URL and page size, used by the test harness
impl From<(DatabaseConnection, PathBuf)> for AppState {
    fn from((db, media_root): (DatabaseConnection, PathBuf)) -> Self {
        Self {
            db,
            images: ImageStore::new(media_root, DEFAULT_MEDIA_URL),
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}
