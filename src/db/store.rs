use crate::db::{connection, repository};
use crate::error::StorageError;
use crate::models::spend::{NewSpend, SpendingRecord};
use std::path::{Path, PathBuf};

/// Storage gateway over the SQLite file at `path`.
///
/// Every call opens its own connection and drops it before returning, so no
/// handle stays open between commands.
#[derive(Debug, Clone)]
pub struct SpendStore {
    path: PathBuf,
}

impl SpendStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn insert(&self, spend: &NewSpend) -> Result<SpendingRecord, StorageError> {
        let conn = connection::establish_connection(&self.path)?;
        repository::insert_spend(&conn, spend)
    }

    pub fn read_all(&self) -> Result<Vec<SpendingRecord>, StorageError> {
        let conn = connection::establish_connection(&self.path)?;
        repository::get_all_spends(&conn)
    }
}
