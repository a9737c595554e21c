use std::sync::Arc;
use uigen_core::config::AppConfig;
use uigen_core::session::SessionIssuer;

/// Shared application state for the server.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub issuer: Arc<SessionIssuer>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let issuer = SessionIssuer::from_config(&config.auth);
        Self::with_issuer(config, issuer)
    }

    pub fn with_issuer(config: AppConfig, issuer: SessionIssuer) -> Self {
        Self {
            config,
            issuer: Arc::new(issuer),
        }
    }
}
