//! Application state for the PestVision server
//!
//! Owns the model provider (and through it the cached classifier handle)
//! plus the server configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use pestvision::ModelProvider;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Directory holding the persisted model artifact
    pub model_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("model"),
        }
    }
}

/// Shared application state
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Provider for the process-wide cached classifier
    pub provider: ModelProvider,
    /// Server start time
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let provider = ModelProvider::new(&config.model_dir);
        Self {
            config,
            provider,
            started_at: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_points_at_model_dir() {
        let config = ServerConfig::default();
        assert_eq!(config.model_dir, PathBuf::from("model"));
    }

    #[test]
    fn test_state_provider_uses_configured_dir() {
        let state = AppState::new(ServerConfig {
            model_dir: PathBuf::from("elsewhere"),
        });
        assert_eq!(state.provider.model_dir(), PathBuf::from("elsewhere"));
    }
}
