//! Web server receiving form photos.
//!
//! One endpoint does the work: `POST /api/upload` reads the photo through the
//! extractor, saves the fields through the store and echoes them back.

mod handlers;
mod response;
mod routes;

pub use handlers::{IMAGE_FIELD, MIN_IMAGE_BYTES};
pub use response::{ApiError, UploadResponse};
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::extraction::{DocumentAiClient, DocumentExtractor};
use crate::repository::{FormStore, MysqlFormStore};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn DocumentExtractor>,
    pub store: Arc<dyn FormStore>,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let extractor = DocumentAiClient::new(&settings.processor, &settings.credentials_path)?;
        tracing::info!("Using Document AI processor {}", extractor.resource_name());

        Ok(Self {
            extractor: Arc::new(extractor),
            store: Arc::new(MysqlFormStore::new(&settings.database)),
        })
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
