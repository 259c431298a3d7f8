use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use log::info;

use crate::api::{build_router, AppState};
use crate::artifact::{ArtifactError, ArtifactStore, DEFAULT_ARTIFACT_PATH};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5001;

/// Resolved settings for the prediction service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub artifact_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServiceConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Loading phase: read the artifact and build the state shared by all requests.
///
/// Any failure here is fatal for the service; there is no way back from
/// serving to loading.
pub fn load_state(config: &ServiceConfig) -> Result<AppState, ArtifactError> {
    let store = ArtifactStore::new(&config.artifact_path);
    let classifier = store.load()?;
    Ok(AppState::new(Arc::new(classifier)))
}

/// Loads the model, binds the listener and serves until Ctrl-C.
pub async fn serve(config: ServiceConfig) -> anyhow::Result<()> {
    let state = load_state(&config)
        .with_context(|| format!("Failed to load model from {:?}", config.artifact_path))?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    let local: SocketAddr = listener.local_addr()?;
    info!("Listening on http://{}", local);
    info!("  Predict: POST http://{}/predict-category", local);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:5001");
        assert_eq!(config.artifact_path, PathBuf::from("category_model.json"));
    }

    #[test]
    fn test_missing_artifact_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ServiceConfig {
            artifact_path: dir.path().join("missing.json"),
            ..ServiceConfig::default()
        };
        assert!(matches!(
            load_state(&config),
            Err(ArtifactError::NotFound(_))
        ));
    }
}
