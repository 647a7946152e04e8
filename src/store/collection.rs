//! Generic JSON-file-backed collection.
//!
//! Each [`Collection`] owns one flat JSON file holding an array of
//! records. The whole array lives in memory behind a
//! [`tokio::sync::RwLock`] and the file is rewritten wholesale after
//! every mutation. Writers on the same collection are serialized by the
//! lock; the last writer wins.

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::ServerError;

/// In-memory view of one JSON data file.
///
/// A mutation only commits when the rewritten file reaches disk: if the
/// write fails, the in-memory state rolls back and the caller gets a
/// [`ServerError::PersistenceError`], so memory never runs ahead of the
/// file.
#[derive(Debug)]
pub struct Collection<T> {
    path: PathBuf,
    items: RwLock<Vec<T>>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Opens the collection, loading existing records from `path`.
    ///
    /// A missing file yields an empty collection. A file that fails to
    /// parse is logged and treated as empty rather than aborting startup.
    #[must_use]
    pub fn open(path: PathBuf) -> Self {
        let items = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<T>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "data file unreadable, starting empty"
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "data file unreadable, starting empty"
                );
                Vec::new()
            }
        };
        Self {
            path,
            items: RwLock::new(items),
        }
    }

    /// Runs `f` with shared access to the records.
    pub async fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let guard = self.items.read().await;
        f(&guard)
    }

    /// Runs `f` with exclusive access to the records.
    ///
    /// `f` returns `(dirty, value)`; the file is rewritten only when
    /// `dirty` is true. On a failed rewrite the in-memory records are
    /// restored to their previous state.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::PersistenceError`] if the rewrite fails.
    pub async fn write<R>(
        &self,
        f: impl FnOnce(&mut Vec<T>) -> (bool, R),
    ) -> Result<R, ServerError> {
        let mut guard = self.items.write().await;
        let backup = guard.clone();
        let (dirty, value) = f(&mut guard);
        if dirty {
            if let Err(e) = self.persist(&guard).await {
                *guard = backup;
                return Err(e);
            }
        }
        Ok(value)
    }

    /// Returns a clone of every record.
    pub async fn all(&self) -> Vec<T> {
        self.read(<[T]>::to_vec).await
    }

    /// Returns a clone of the first record matching `pred`.
    pub async fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.read(|items| items.iter().find(|t| pred(t)).cloned())
            .await
    }

    /// Returns clones of every record matching `pred`.
    pub async fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.read(|items| items.iter().filter(|t| pred(t)).cloned().collect())
            .await
    }

    /// Appends a record and rewrites the file.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::PersistenceError`] if the rewrite fails.
    pub async fn insert(&self, item: T) -> Result<(), ServerError> {
        self.write(|items| {
            items.push(item);
            (true, ())
        })
        .await
    }

    /// Appends several records in one rewrite.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::PersistenceError`] if the rewrite fails.
    pub async fn insert_many(&self, batch: Vec<T>) -> Result<(), ServerError> {
        if batch.is_empty() {
            return Ok(());
        }
        self.write(|items| {
            items.extend(batch);
            (true, ())
        })
        .await
    }

    /// Applies `mutate` to the first record matching `pred`, returning
    /// the updated record. Returns `Ok(None)` without touching the file
    /// when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::PersistenceError`] if the rewrite fails.
    pub async fn update_where(
        &self,
        pred: impl Fn(&T) -> bool,
        mutate: impl FnOnce(&mut T),
    ) -> Result<Option<T>, ServerError> {
        self.write(|items| match items.iter_mut().find(|t| pred(t)) {
            Some(item) => {
                mutate(item);
                (true, Some(item.clone()))
            }
            None => (false, None),
        })
        .await
    }

    /// Removes every record matching `pred`, returning how many were
    /// removed. The file is only rewritten when something was removed.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::PersistenceError`] if the rewrite fails.
    pub async fn remove_where(&self, pred: impl Fn(&T) -> bool) -> Result<usize, ServerError> {
        self.write(|items| {
            let before = items.len();
            items.retain(|t| !pred(t));
            let removed = before - items.len();
            (removed > 0, removed)
        })
        .await
    }

    /// Returns the number of records.
    pub async fn len(&self) -> usize {
        self.read(<[T]>::len).await
    }

    /// Returns `true` if the collection holds no records.
    pub async fn is_empty(&self) -> bool {
        self.read(<[T]>::is_empty).await
    }

    /// Rewrites the backing file with the given records.
    async fn persist(&self, items: &[T]) -> Result<(), ServerError> {
        let json = serde_json::to_string_pretty(items).map_err(|e| {
            ServerError::PersistenceError(format!("encode {}: {e}", self.path.display()))
        })?;
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            ServerError::PersistenceError(format!("write {}: {e}", self.path.display()))
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u32,
        label: String,
    }

    fn row(id: u32, label: &str) -> Row {
        Row {
            id,
            label: label.to_string(),
        }
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let col: Collection<Row> = Collection::open(dir.path().join("rows.json"));
        assert!(col.is_empty().await);
    }

    #[tokio::test]
    async fn corrupt_file_opens_empty() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let path = dir.path().join("rows.json");
        if std::fs::write(&path, "{not json").is_err() {
            panic!("seed write failed");
        }
        let col: Collection<Row> = Collection::open(path);
        assert!(col.is_empty().await);
    }

    #[tokio::test]
    async fn insert_survives_reopen() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let path = dir.path().join("rows.json");

        let col: Collection<Row> = Collection::open(path.clone());
        let result = col.insert(row(1, "first")).await;
        assert!(result.is_ok());

        let reopened: Collection<Row> = Collection::open(path);
        assert_eq!(reopened.all().await, vec![row(1, "first")]);
    }

    #[tokio::test]
    async fn update_where_mutates_first_match() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let col: Collection<Row> = Collection::open(dir.path().join("rows.json"));
        let _ = col.insert(row(1, "a")).await;
        let _ = col.insert(row(2, "b")).await;

        let updated = col
            .update_where(|r| r.id == 2, |r| r.label = "changed".to_string())
            .await;
        let Ok(Some(updated)) = updated else {
            panic!("expected an updated record");
        };
        assert_eq!(updated.label, "changed");
        assert_eq!(col.find(|r| r.id == 1).await, Some(row(1, "a")));
    }

    #[tokio::test]
    async fn update_where_without_match_is_none() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let col: Collection<Row> = Collection::open(dir.path().join("rows.json"));
        let result = col.update_where(|r| r.id == 9, |_| {}).await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn remove_where_reports_count() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let col: Collection<Row> = Collection::open(dir.path().join("rows.json"));
        let _ = col.insert(row(1, "x")).await;
        let _ = col.insert(row(2, "x")).await;
        let _ = col.insert(row(3, "y")).await;

        let removed = col.remove_where(|r| r.label == "x").await;
        assert!(matches!(removed, Ok(2)));
        assert_eq!(col.len().await, 1);
    }

    #[tokio::test]
    async fn failed_rewrite_rolls_back_memory() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        // A directory at the file path makes every rewrite fail.
        let path = dir.path().join("rows.json");
        if std::fs::create_dir(&path).is_err() {
            panic!("setup failed");
        }
        let col: Collection<Row> = Collection::open(path);

        let result = col.insert(row(1, "doomed")).await;
        assert!(result.is_err());
        assert!(col.is_empty().await);
    }

    #[tokio::test]
    async fn write_decides_outcome_under_one_lock() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let col: Collection<Row> = Collection::open(dir.path().join("rows.json"));
        let _ = col.insert(row(1, "fresh")).await;

        // Claim the row only if it is still fresh; both steps happen
        // under the same write lock.
        let claim = |items: &mut Vec<Row>| match items.iter_mut().find(|r| r.id == 1) {
            Some(r) if r.label == "fresh" => {
                r.label = "claimed".to_string();
                (true, true)
            }
            _ => (false, false),
        };

        let first = col.write(claim).await;
        assert!(matches!(first, Ok(true)));
        let second = col.write(claim).await;
        assert!(matches!(second, Ok(false)));
    }
}
