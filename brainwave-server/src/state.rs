use std::{sync::Arc, time::Instant};

use sea_orm::DatabaseConnection;

use crate::auth::token::TokenKeys;
use crate::config::AppConfig;

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenKeys>,
    pub started_at: Instant,
}

impl AppState {
    /// # Errors
    ///
    /// Fails when the configured token lifetime cannot be parsed.
    pub fn new(db: DatabaseConnection, config: AppConfig) -> anyhow::Result<Self> {
        let tokens = TokenKeys::new(config.jwt_secret.as_bytes(), config.token_lifetime()?);
        Ok(Self {
            db,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            started_at: Instant::now(),
        })
    }
}
