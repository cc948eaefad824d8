use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{config::Config, error::RelayError, relay::RelayClient, upload::UploadGate};

pub struct AppState {
    pub config: Config,
    pub relay: RelayClient,
    gate: Mutex<UploadGate>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Arc<Self>, RelayError> {
        let relay = RelayClient::new(config.backend_url.clone(), config.relay_timeout)?;

        Ok(Arc::new(Self {
            config,
            relay,
            gate: Mutex::new(UploadGate::new()),
        }))
    }

    /// Locks the dashboard gate. Never hold the guard across an `.await`.
    pub fn gate(&self) -> MutexGuard<'_, UploadGate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
