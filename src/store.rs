use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Defensive cap on stored query length; queries are user-supplied and
/// otherwise unbounded.
pub const MAX_QUERY_CHARS: usize = 512;

/// One logged search. Immutable once created; the log as a whole is replaced
/// on every append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    pub query: String,
    /// RFC 3339 UTC, assigned by the store at append time.
    pub timestamp: String,
    #[serde(default)]
    pub source_address: String,
    #[serde(default = "unknown_agent")]
    pub user_agent: String,
}

fn unknown_agent() -> String {
    "unknown".to_string()
}

/// Best-effort client metadata captured at the HTTP boundary.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub source_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug)]
pub enum StoreError {
    /// The backing file could not be read or written.
    Persistence {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The updated log could not be serialized.
    Encode(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence { path, source } => {
                write!(f, "search log {} unavailable: {source}", path.display())
            }
            Self::Encode(e) => write!(f, "failed to encode search log: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Persistence { source, .. } => Some(source),
            Self::Encode(e) => Some(e),
        }
    }
}

/// Bounded, newest-first search log persisted as a JSON array.
///
/// The store is the sole owner of the backing file. Every access — including
/// reads — goes through one `tokio::sync::Mutex` held across the whole
/// read-modify-write sequence, so concurrent appends cannot lose updates and
/// readers never observe a partially written file. The lock is in-process
/// only: the service deploys as a single process and nothing else touches the
/// file.
pub struct EntryStore {
    path: PathBuf,
    max_entries: usize,
    lock: Mutex<()>,
}

impl EntryStore {
    pub fn new(path: PathBuf, max_entries: usize) -> Self {
        Self {
            path,
            max_entries,
            lock: Mutex::new(()),
        }
    }

    /// Create the backing file (and its parent directory) with an empty log
    /// if it does not exist yet. Idempotent; safe to call concurrently.
    ///
    /// # Errors
    /// Returns [`StoreError::Persistence`] if the directory or file cannot be
    /// created.
    pub async fn ensure_exists(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        if tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| self.persistence(e))?
        {
            return Ok(());
        }
        self.write_locked(&[]).await
    }

    /// Current log, newest first. A missing file is an empty log; undecodable
    /// content degrades to an empty log with a server-side warning rather
    /// than failing the caller.
    ///
    /// # Errors
    /// Returns [`StoreError::Persistence`] only for I/O failures other than
    /// the file not existing.
    pub async fn read_all(&self) -> Result<Vec<SearchEntry>, StoreError> {
        let _guard = self.lock.lock().await;
        self.read_locked().await
    }

    /// Stamp a new entry, prepend it, evict beyond the cap, and overwrite the
    /// backing file. The whole sequence runs under the store lock.
    ///
    /// # Errors
    /// Returns [`StoreError::Persistence`] if the file cannot be read or
    /// written, [`StoreError::Encode`] if serialization fails. Write-path
    /// failures are never swallowed.
    pub async fn append(&self, query: &str, client: &ClientInfo) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_locked().await?;
        entries.insert(
            0,
            SearchEntry {
                query: query.trim().chars().take(MAX_QUERY_CHARS).collect(),
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                source_address: client.source_address.clone().unwrap_or_default(),
                user_agent: client.user_agent.clone().unwrap_or_else(unknown_agent),
            },
        );
        entries.truncate(self.max_entries);
        self.write_locked(&entries).await
    }

    async fn read_locked(&self) -> Result<Vec<SearchEntry>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.persistence(e)),
        };
        match serde_json::from_str(&contents) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "search log is not a valid entry array, treating as empty: {e}"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn write_locked(&self, entries: &[SearchEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.persistence(e))?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(StoreError::Encode)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.persistence(e))
    }

    fn persistence(&self, source: std::io::Error) -> StoreError {
        StoreError::Persistence {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn temp_store(max_entries: usize) -> (TempDir, EntryStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = EntryStore::new(dir.path().join("search-log.json"), max_entries);
        (dir, store)
    }

    // --- ensure_exists ---

    #[tokio::test]
    async fn ensure_exists_creates_empty_log_and_parent_dirs() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("data").join("log.json");
        let store = EntryStore::new(path.clone(), 50);
        store.ensure_exists().await.expect("ensure");
        let contents = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(contents, "[]");
    }

    #[tokio::test]
    async fn ensure_exists_leaves_existing_log_alone() {
        let (_dir, store) = temp_store(50);
        store
            .append("blade runner", &ClientInfo::default())
            .await
            .expect("append");
        store.ensure_exists().await.expect("second ensure");
        let entries = store.read_all().await.expect("read");
        assert_eq!(entries.len(), 1);
    }

    // --- read_all ---

    #[tokio::test]
    async fn read_all_missing_file_is_empty() {
        let (_dir, store) = temp_store(50);
        assert_eq!(store.read_all().await.expect("read"), vec![]);
    }

    #[tokio::test]
    async fn read_all_corrupt_file_degrades_to_empty() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("log.json");
        std::fs::write(&path, "{not json").expect("write garbage");
        let store = EntryStore::new(path, 50);
        assert_eq!(store.read_all().await.expect("read"), vec![]);
    }

    #[tokio::test]
    async fn read_all_non_array_json_degrades_to_empty() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("log.json");
        std::fs::write(&path, r#"{"query":"lone object"}"#).expect("write");
        let store = EntryStore::new(path, 50);
        assert_eq!(store.read_all().await.expect("read"), vec![]);
    }

    #[test]
    fn entries_missing_optional_fields_get_defaults() {
        let entry: SearchEntry =
            serde_json::from_str(r#"{"query":"dune","timestamp":"2024-01-01T00:00:00.000Z"}"#)
                .expect("parse");
        assert_eq!(entry.source_address, "");
        assert_eq!(entry.user_agent, "unknown");
    }

    #[test]
    fn entries_serialize_with_camel_case_fields() {
        let entry = SearchEntry {
            query: "dune".into(),
            timestamp: "2024-01-01T00:00:00.000Z".into(),
            source_address: "127.0.0.1".into(),
            user_agent: "curl/8".into(),
        };
        let json = serde_json::to_value(&entry).expect("to_value");
        assert_eq!(json["sourceAddress"], "127.0.0.1");
        assert_eq!(json["userAgent"], "curl/8");
    }

    // --- append ---

    #[tokio::test]
    async fn append_then_read_yields_new_entry_first() {
        let (_dir, store) = temp_store(50);
        store
            .append("alien", &ClientInfo::default())
            .await
            .expect("first");
        store
            .append("aliens", &ClientInfo::default())
            .await
            .expect("second");
        let entries = store.read_all().await.expect("read");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].query, "aliens");
        assert_eq!(entries[1].query, "alien");
    }

    #[tokio::test]
    async fn append_records_client_metadata_with_defaults() {
        let (_dir, store) = temp_store(50);
        store
            .append(
                "heat",
                &ClientInfo {
                    source_address: Some("203.0.113.9".into()),
                    user_agent: None,
                },
            )
            .await
            .expect("append");
        let entries = store.read_all().await.expect("read");
        assert_eq!(entries[0].source_address, "203.0.113.9");
        assert_eq!(entries[0].user_agent, "unknown");
    }

    #[tokio::test]
    async fn append_trims_and_caps_query() {
        let (_dir, store) = temp_store(50);
        store
            .append("  padded  ", &ClientInfo::default())
            .await
            .expect("append trimmed");
        let long = "x".repeat(MAX_QUERY_CHARS + 100);
        store
            .append(&long, &ClientInfo::default())
            .await
            .expect("append long");
        let entries = store.read_all().await.expect("read");
        assert_eq!(entries[0].query.chars().count(), MAX_QUERY_CHARS);
        assert_eq!(entries[1].query, "padded");
    }

    #[tokio::test]
    async fn append_stamps_parseable_rfc3339_timestamp() {
        let (_dir, store) = temp_store(50);
        store
            .append("memento", &ClientInfo::default())
            .await
            .expect("append");
        let entries = store.read_all().await.expect("read");
        assert!(
            chrono::DateTime::parse_from_rfc3339(&entries[0].timestamp).is_ok(),
            "timestamp {:?} should be RFC 3339",
            entries[0].timestamp
        );
    }

    #[tokio::test]
    async fn append_beyond_cap_evicts_oldest() {
        let (_dir, store) = temp_store(3);
        for q in ["one", "two", "three", "four", "five"] {
            store.append(q, &ClientInfo::default()).await.expect("append");
        }
        let entries = store.read_all().await.expect("read");
        let queries: Vec<&str> = entries.iter().map(|e| e.query.as_str()).collect();
        assert_eq!(queries, ["five", "four", "three"]);
    }

    #[tokio::test]
    async fn append_recovers_from_corrupt_log() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("log.json");
        std::fs::write(&path, "]]garbage[[").expect("write garbage");
        let store = EntryStore::new(path, 50);
        store
            .append("fresh start", &ClientInfo::default())
            .await
            .expect("append over corrupt log");
        let entries = store.read_all().await.expect("read");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].query, "fresh start");
    }

    // --- concurrency ---

    #[tokio::test]
    async fn concurrent_appends_lose_no_entries() {
        let (_dir, store) = temp_store(50);
        let store = Arc::new(store);
        let mut handles = Vec::new();
        for i in 0..20 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .append(&format!("query-{i}"), &ClientInfo::default())
                    .await
            }));
        }
        for handle in handles {
            handle.await.expect("task").expect("append");
        }
        let entries = store.read_all().await.expect("read");
        assert_eq!(entries.len(), 20);
        for i in 0..20 {
            assert!(
                entries.iter().any(|e| e.query == format!("query-{i}")),
                "query-{i} lost"
            );
        }
    }
}
