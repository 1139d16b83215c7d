//! Shared application state.
//!
//! `CoreState` owns the single SQLite connection and the patient listing
//! cache. It is wrapped in `Arc` at startup and handed to the HTTP layer.
//! Lock order is always database first, then cache slot.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db;
use crate::listing_cache::ListingCache;
use crate::models::PatientDto;
use crate::services::{patient, ServiceError};

pub struct CoreState {
    db: Mutex<Connection>,
    patient_listing: ListingCache<PatientDto>,
}

impl CoreState {
    /// Wrap an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
            patient_listing: ListingCache::new("active_patients"),
        }
    }

    /// Open (and migrate) the database selected by `config`.
    pub fn open(config: &AppConfig) -> Result<Self, CoreError> {
        let conn = match &config.database_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Opening clinic database");
                db::open_database(path)?
            }
            None => {
                tracing::warn!("Using in-memory database; data is lost on exit");
                db::open_memory_database()?
            }
        };
        Ok(Self::new(conn))
    }

    pub fn in_memory() -> Result<Self, CoreError> {
        Ok(Self::new(db::open_memory_database()?))
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_db<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<CoreError>,
    {
        let conn = self.db.lock().map_err(|_| CoreError::LockPoisoned)?;
        f(&conn)
    }

    /// Active patients, served from the listing cache when warm.
    pub fn list_active_patients(&self) -> Result<Arc<Vec<PatientDto>>, ServiceError> {
        self.with_db(|conn| {
            self.patient_listing
                .get_or_load(|| patient::list_active(conn))
        })
    }

    /// Run a patient write and drop the cached listing before the
    /// connection lock is released.
    pub fn write_patients<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&Connection) -> Result<T, ServiceError>,
    {
        self.with_db(|conn| {
            let result = f(conn);
            if result.is_ok() {
                self.patient_listing.invalidate();
            }
            result
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
}
