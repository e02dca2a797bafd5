//! Shared server state and the listener loop

use std::sync::Arc;

use elemental_core::ElementsDatabase;
use elemental_search::{PathFinder, SearchConfig};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::payload::SearchRequest;
use crate::sse::create_router;

/// Listener and request defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,

    /// Require `Authorization: Bearer <token>` on everything but `/health`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// Deadline used when a request names none
    #[serde(default = "default_deadline_secs")]
    pub default_deadline_secs: u64,

    /// Buffered progress events per streaming request
    #[serde(default = "default_progress_capacity")]
    pub progress_capacity: usize,
}

fn default_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_deadline_secs() -> u64 {
    30
}

fn default_progress_capacity() -> usize {
    256
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            auth_token: None,
            default_deadline_secs: default_deadline_secs(),
            progress_capacity: default_progress_capacity(),
        }
    }
}

/// Catalog and settings shared by every handler
pub struct AppState {
    db: Arc<ElementsDatabase>,
    search: SearchConfig,
    config: ServerConfig,
}

impl AppState {
    pub fn new(db: Arc<ElementsDatabase>, search: SearchConfig, config: ServerConfig) -> Self {
        Self { db, search, config }
    }

    pub fn database(&self) -> &ElementsDatabase {
        &self.db
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Path finder with the request's overrides applied
    pub fn finder_for(&self, request: &SearchRequest) -> Result<PathFinder, ApiError> {
        let mut search = self.search.clone();
        if let Some(strategy) = request.strategy()? {
            search = search.with_strategy(strategy);
        }
        if let Some(start) = &request.start_elements {
            search = search.with_start_elements(start.clone());
        }
        Ok(PathFinder::with_config(self.db.clone(), search))
    }

    pub fn deadline_for(&self, request: &SearchRequest) -> u64 {
        request
            .deadline_seconds
            .unwrap_or(self.config.default_deadline_secs)
    }
}

/// Serve the HTTP API until the listener fails
pub async fn run_server(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.addr.clone();
    let elements = state.db.len();
    let router = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Elemental server listening on {} ({} elements)", addr, elements);
    tracing::info!("  Search: POST http://{}/search", addr);
    tracing::info!("  Progress stream: GET http://{}/search/stream", addr);
    tracing::info!("  Health check: http://{}/health", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
