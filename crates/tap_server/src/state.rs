//! Application state

use std::sync::Arc;
use std::time::Instant;

use tap_core::{TieredAccessProtocol, X402Client};

use crate::{config::ServerConfig, error::ServerResult};

#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub protocol: Arc<TieredAccessProtocol>,
    started_at: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let settlement = X402Client::new(&config.tap.settlement)?;
        let protocol = Arc::new(TieredAccessProtocol::new(
            config.tap.catalog(),
            Arc::new(settlement),
        ));

        Ok(Self {
            config,
            protocol,
            started_at: Instant::now(),
        })
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
