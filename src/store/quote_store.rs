//! Quote store
//!
//! Owns the quote collection for the lifetime of one command and mediates
//! every access to the backing file: load once, mutate in memory, write the
//! whole file back after each mutation.

use std::fmt;
use std::path::{Path, PathBuf};

use nix::fcntl::{Flock, FlockArg};
use tokio::fs::OpenOptions;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::{Result, StoreError};

use super::QuoteCollection;

/// A loaded quote collection bound to its backing file
///
/// The only way to get one is [`QuoteStore::open`], so every store is
/// already in its loaded state.
pub struct QuoteStore {
    /// Backing file
    path: PathBuf,
    /// In-memory copy of the file content
    quotes: QuoteCollection,
    /// Exclusive advisory lock, released on drop
    _lock: Option<Flock<std::fs::File>>,
}

impl QuoteStore {
    /// Open the store described by the configuration
    pub async fn from_config(config: &Config) -> Result<Self> {
        let path = config.store_path()?;
        Self::open(path, config.lock).await
    }

    /// Open a backing file, creating it if needed.
    ///
    /// Existing content is never truncated. Content that does not parse as a
    /// quote collection is replaced by an empty collection on disk.
    #[instrument(skip(path))]
    pub async fn open(path: impl Into<PathBuf>, lock: bool) -> Result<Self> {
        let path = path.into();
        debug!("Opening quote file {}", path.display());

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;

        let lock = if lock {
            Some(Self::lock_exclusive(&path, file.into_std().await).await?)
        } else {
            None
        };

        let content = tokio::fs::read(&path)
            .await
            .map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;

        let mut store = Self {
            path,
            quotes: QuoteCollection::new(),
            _lock: lock,
        };

        match QuoteCollection::parse(&content) {
            Some(quotes) => {
                debug!("Loaded {} quotes", quotes.len());
                store.quotes = quotes;
            }
            None => {
                if !content.is_empty() {
                    warn!(
                        "Quote file {} is not a valid quote collection, resetting it",
                        store.path.display()
                    );
                }
                store.persist().await?;
            }
        }

        Ok(store)
    }

    async fn lock_exclusive(path: &Path, file: std::fs::File) -> Result<Flock<std::fs::File>> {
        debug!("Waiting for exclusive lock");
        let locked = tokio::task::spawn_blocking(move || {
            Flock::lock(file, FlockArg::LockExclusive).map_err(|(_, errno)| errno)
        })
        .await
        .map_err(std::io::Error::other)?;

        locked.map_err(|source| {
            StoreError::Lock {
                path: path.to_path_buf(),
                source,
            }
            .into()
        })
    }

    /// Insert or overwrite a quote, then persist
    #[instrument(skip(self, quote))]
    pub async fn set(&mut self, label: &str, quote: &str) -> Result<()> {
        if self.quotes.set(label.to_string(), quote.to_string()).is_some() {
            debug!("Overwrote existing quote");
        }
        self.persist().await
    }

    /// Remove a quote if present, then persist
    #[instrument(skip(self))]
    pub async fn remove(&mut self, label: &str) -> Result<()> {
        if self.quotes.remove(label).is_none() {
            debug!("No quote to remove");
        }
        self.persist().await
    }

    /// Look up a quote by exact label
    pub fn get(&self, label: &str) -> Option<&str> {
        self.quotes.get(label)
    }

    /// Overwrite the backing file with the whole in-memory collection
    pub async fn persist(&self) -> Result<()> {
        let content = self.quotes.to_json().map_err(StoreError::Serialize)?;

        tokio::fs::write(&self.path, content)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;

        debug!("Persisted {} quotes to {}", self.quotes.len(), self.path.display());
        Ok(())
    }

    /// The loaded collection
    pub fn quotes(&self) -> &QuoteCollection {
        &self.quotes
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for QuoteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteStore")
            .field("path", &self.path)
            .field("quotes", &self.quotes)
            .field("locked", &self._lock.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store_path(temp_dir: &TempDir) -> PathBuf {
        temp_dir.path().join("quotes.db.json")
    }

    #[tokio::test]
    async fn test_missing_file_bootstrap() {
        let temp_dir = TempDir::new().unwrap();
        let path = store_path(&temp_dir);

        let store = QuoteStore::open(path.clone(), false).await.unwrap();
        assert!(store.quotes().is_empty());
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_corrupt_file_recovery() {
        let temp_dir = TempDir::new().unwrap();
        let path = store_path(&temp_dir);
        std::fs::write(&path, "not-json").unwrap();

        let store = QuoteStore::open(path.clone(), false).await.unwrap();
        assert!(store.quotes().is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_non_string_values_are_reset() {
        let temp_dir = TempDir::new().unwrap();
        let path = store_path(&temp_dir);
        std::fs::write(&path, r#"{"answer": 42}"#).unwrap();

        let store = QuoteStore::open(path.clone(), false).await.unwrap();
        assert_eq!(store.get("answer"), None);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_existing_content_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let path = store_path(&temp_dir);
        let original = r#"{ "greeting": "Hello world" }"#;
        std::fs::write(&path, original).unwrap();

        let store = QuoteStore::open(path.clone(), false).await.unwrap();
        assert_eq!(store.get("greeting"), Some("Hello world"));
        // Loading alone does not rewrite a valid file
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[tokio::test]
    async fn test_set_persists_immediately() {
        let temp_dir = TempDir::new().unwrap();
        let path = store_path(&temp_dir);

        let mut store = QuoteStore::open(path.clone(), false).await.unwrap();
        store.set("greeting", "Hello world").await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"{"greeting":"Hello world"}"#
        );
    }

    #[tokio::test]
    async fn test_overwrite_last_write_wins() {
        let temp_dir = TempDir::new().unwrap();
        let path = store_path(&temp_dir);

        let mut store = QuoteStore::open(path.clone(), false).await.unwrap();
        store.set("motto", "first").await.unwrap();
        store.set("motto", "second").await.unwrap();
        assert_eq!(store.get("motto"), Some("second"));
        drop(store);

        let reloaded = QuoteStore::open(path.clone(), false).await.unwrap();
        assert_eq!(reloaded.get("motto"), Some("second"));
        assert_eq!(reloaded.quotes().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let path = store_path(&temp_dir);

        let mut store = QuoteStore::open(path.clone(), false).await.unwrap();
        store.set("keep", "me").await.unwrap();
        let before = store.quotes().clone();

        store.remove("missing").await.unwrap();
        assert_eq!(store.quotes(), &before);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"keep":"me"}"#);
    }

    #[tokio::test]
    async fn test_absent_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let store = QuoteStore::open(store_path(&temp_dir), false).await.unwrap();
        assert_eq!(store.get("never-set"), None);
    }

    #[tokio::test]
    async fn test_missing_directory_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no-such-dir").join("quotes.db.json");

        let err = QuoteStore::open(path.clone(), false).await.unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::Read { .. })));
    }

    #[tokio::test]
    async fn test_locked_store_releases_on_drop() {
        let temp_dir = TempDir::new().unwrap();
        let path = store_path(&temp_dir);

        let mut store = QuoteStore::open(path.clone(), true).await.unwrap();
        store.set("a", "b").await.unwrap();
        drop(store);

        let store = QuoteStore::open(path.clone(), true).await.unwrap();
        assert_eq!(store.get("a"), Some("b"));
    }

    #[tokio::test]
    async fn test_from_config_uses_store_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            store_file: temp_dir.path().join("custom.json"),
            ..Config::default()
        };

        let store = QuoteStore::from_config(&config).await.unwrap();
        assert_eq!(store.path(), temp_dir.path().join("custom.json"));
    }
}
