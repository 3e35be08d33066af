use crate::errors::AppError;
use crate::models::{Achievement, CheckInRecord};
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::error;

pub const CHECKINS_KEY: &str = "checkins";
pub const NOTES_KEY: &str = "notes";

/// String-valued key-value store, one file per key under a data directory.
#[derive(Debug, Clone)]
pub struct KvStore {
    dir: PathBuf,
}

impl KvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, std::io::Error> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Full overwrite of `key`.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), std::io::Error> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.path_for(key), value).await
    }
}

pub async fn load_check_ins(store: &KvStore) -> CheckInRecord {
    load_or_default(store, CHECKINS_KEY).await
}

pub async fn load_notes(store: &KvStore) -> Vec<Achievement> {
    load_or_default(store, NOTES_KEY).await
}

pub async fn persist_check_ins(store: &KvStore, record: &CheckInRecord) -> Result<(), AppError> {
    persist(store, CHECKINS_KEY, record).await
}

pub async fn persist_notes(store: &KvStore, notes: &[Achievement]) -> Result<(), AppError> {
    persist(store, NOTES_KEY, notes).await
}

async fn load_or_default<T: DeserializeOwned + Default>(store: &KvStore, key: &str) -> T {
    match store.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                error!("failed to parse stored {key}: {err}");
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(err) => {
            error!("failed to read stored {key}: {err}");
            T::default()
        }
    }
}

async fn persist<T: Serialize + ?Sized>(store: &KvStore, key: &str, value: &T) -> Result<(), AppError> {
    let payload = serde_json::to_string(value).map_err(AppError::internal)?;
    store.set(key, &payload).await.map_err(AppError::internal)?;
    Ok(())
}
