use std::sync::Arc;

use chronicle_core::{model::repository::db::Database, storage::UploadStorage};

pub struct AppState {
    pub db: Database,
    pub uploads: UploadStorage,
}

pub type SharedState = Arc<AppState>;
