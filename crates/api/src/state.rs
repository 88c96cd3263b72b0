use std::sync::Arc;

use foodgram_core::short_code::ShortCodeCodec;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: foodgram_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Recipe short-code codec, built once from `config.short_link`.
    pub short_codes: Arc<ShortCodeCodec>,
}

impl AppState {
    pub fn new(pool: foodgram_db::DbPool, config: ServerConfig) -> Self {
        let short_codes = ShortCodeCodec::new(&config.short_link.salt, config.short_link.min_length);
        Self {
            pool,
            config: Arc::new(config),
            short_codes: Arc::new(short_codes),
        }
    }

    /// Absolute public URL for `path` (which must start with `/`).
    pub fn public_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.public_base_url)
    }
}
