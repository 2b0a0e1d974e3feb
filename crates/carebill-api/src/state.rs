use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use jsonwebtoken::DecodingKey;

use carebill_core::models::settings::PracticeSettings;
use carebill_core::storage_keys;
use carebill_storage::state::load_state_opt;
use carebill_storage::store::ObjectStore;

use crate::config::ApiConfig;
use crate::error::ApiError;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObjectStore>,
    pub auth: Arc<TokenVerifier>,
    pub imports: Arc<ImportGuard>,
}

pub struct TokenVerifier {
    pub decoding_key: DecodingKey,
    pub issuer: String,
}

impl AppState {
    pub fn new(store: Arc<dyn ObjectStore>, config: &ApiConfig) -> Self {
        Self {
            store,
            auth: Arc::new(TokenVerifier {
                decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
                issuer: config.jwt_issuer.clone(),
            }),
            imports: Arc::new(ImportGuard::default()),
        }
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    /// Stored practice settings, or the defaults if none have been saved yet.
    pub async fn settings(&self) -> Result<PracticeSettings, ApiError> {
        Ok(self.settings_with_etag().await?.0)
    }

    pub async fn settings_with_etag(
        &self,
    ) -> Result<(PracticeSettings, Option<String>), ApiError> {
        match load_state_opt::<PracticeSettings>(self.store(), storage_keys::PRACTICE_SETTINGS).await? {
            Some((settings, etag)) => Ok((settings.migrate()?, Some(etag))),
            None => Ok((PracticeSettings::default(), None)),
        }
    }
}

/// Allows one CSV import at a time per process.
#[derive(Default)]
pub struct ImportGuard {
    running: AtomicBool,
}

impl ImportGuard {
    /// `None` while another import holds the guard.
    pub fn try_begin(&self) -> Option<ImportTicket<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ImportTicket { guard: self })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Releases the import guard when dropped.
pub struct ImportTicket<'a> {
    guard: &'a ImportGuard,
}

impl Drop for ImportTicket<'_> {
    fn drop(&mut self) {
        self.guard.running.store(false, Ordering::Release);
    }
}

/// Today's date in the practice's local time zone.
pub fn today() -> jiff::civil::Date {
    jiff::Zoned::now().date()
}
