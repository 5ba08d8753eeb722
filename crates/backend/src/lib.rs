//! Client for the hosted backend that stores Playora's data.
//!
//! The backend exposes three services, each behind an [`async_trait`] seam:
//!
//! - [`RecordStore`] -- the `games` table (PostgREST).
//! - [`ObjectStore`] -- the thumbnail bucket (Storage).
//! - [`AuthProvider`] -- reviewer sessions (GoTrue).
//!
//! [`Backend`] bundles one implementation of each and is passed explicitly
//! to whoever needs it. [`Backend::supabase`] talks HTTP via [`reqwest`];
//! [`memory::InMemoryBackend`] keeps everything in process for tests.
//!
//! [`review::ReviewDesk`] drives the admin dashboard's optimistic status
//! transitions on top of these seams.

pub mod auth;
pub mod config;
pub mod error;
mod http;
pub mod memory;
pub mod records;
pub mod review;
pub mod storage;

use std::sync::Arc;

pub use auth::{AuthProvider, Credentials, Session, SessionUser, SupabaseAuth};
pub use config::BackendConfig;
pub use error::BackendError;
pub use records::{RecordStore, SupabaseRecords};
pub use storage::{ObjectStore, SupabaseStorage};

/// Handles to every backend service.
///
/// Cheaply cloneable; built once at startup and shared through application
/// state.
#[derive(Clone)]
pub struct Backend {
    pub records: Arc<dyn RecordStore>,
    pub storage: Arc<dyn ObjectStore>,
    pub auth: Arc<dyn AuthProvider>,
}

impl Backend {
    /// Connect to a Supabase project described by `config`.
    pub fn supabase(config: &BackendConfig) -> Result<Self, BackendError> {
        let rest = http::RestClient::new(config)?;
        Ok(Self {
            records: Arc::new(SupabaseRecords::new(rest.clone(), &config.games_table)),
            storage: Arc::new(SupabaseStorage::new(rest.clone(), &config.thumbnails_bucket)),
            auth: Arc::new(SupabaseAuth::new(rest)),
        })
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend").finish_non_exhaustive()
    }
}
