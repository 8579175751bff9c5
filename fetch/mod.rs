/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Snapshot acquisition seam.
//!
//! The canvas never fetches inline: `spawn_fetch` runs a `SnapshotSource` on a
//! worker thread and delivers exactly one `FetchOutcome` over a channel. The
//! UI thread drains the channel non-blockingly each frame. Outcomes carry the
//! generation counter of the refresh that started them so a stale fetch that
//! lands after a newer refresh is discarded instead of clobbering state.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use thiserror::Error;

pub mod types;

use types::GraphSnapshot;

/// Why a snapshot could not be produced.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    Status(u16),

    #[error("malformed snapshot payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("could not read snapshot file: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that can produce a graph snapshot.
///
/// Implementations block; callers are expected to run them off the UI thread
/// via `spawn_fetch`.
pub trait SnapshotSource: Send + Sync {
    fn fetch(&self) -> Result<GraphSnapshot, FetchError>;
}

/// HTTP source hitting the notes backend's graph endpoint.
pub struct HttpSnapshotSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpSnapshotSource {
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl SnapshotSource for HttpSnapshotSource {
    fn fetch(&self) -> Result<GraphSnapshot, FetchError> {
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// File source for demos and offline use.
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for FileSnapshotSource {
    fn fetch(&self) -> Result<GraphSnapshot, FetchError> {
        let body = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Result of one fetch attempt, tagged with the refresh generation.
pub struct FetchOutcome {
    pub generation: u64,
    pub result: Result<GraphSnapshot, FetchError>,
}

/// Run `source.fetch()` on a worker thread; the outcome arrives on `tx`.
///
/// A dropped receiver just means the canvas was torn down mid-fetch; the send
/// error is ignored and the thread exits.
pub fn spawn_fetch(source: Arc<dyn SnapshotSource>, generation: u64, tx: Sender<FetchOutcome>) {
    thread::spawn(move || {
        let result = source.fetch();
        if let Err(err) = &result {
            log::debug!("fetch generation {generation} failed: {err}");
        }
        let _ = tx.send(FetchOutcome { generation, result });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    struct CannedSource(GraphSnapshot);

    impl SnapshotSource for CannedSource {
        fn fetch(&self) -> Result<GraphSnapshot, FetchError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl SnapshotSource for FailingSource {
        fn fetch(&self) -> Result<GraphSnapshot, FetchError> {
            Err(FetchError::Status(503))
        }
    }

    #[test]
    fn test_spawned_fetch_delivers_outcome() {
        let (tx, rx) = unbounded();
        spawn_fetch(Arc::new(CannedSource(GraphSnapshot::default())), 7, tx);
        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.generation, 7);
        assert!(outcome.result.is_ok());
    }

    #[test]
    fn test_spawned_fetch_delivers_error() {
        let (tx, rx) = unbounded();
        spawn_fetch(Arc::new(FailingSource), 1, tx);
        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        match outcome.result {
            Err(FetchError::Status(code)) => assert_eq!(code, 503),
            other => panic!("unexpected outcome: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_file_source_reads_snapshot() {
        let dir = std::env::temp_dir().join("notegraph-fetch-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("snapshot.json");
        fs::write(&path, r#"{"nodes": [], "connections": [], "total_nodes": 0}"#).unwrap();

        let source = FileSnapshotSource::new(&path);
        let snapshot = source.fetch().unwrap();
        assert!(snapshot.nodes.is_empty());
    }

    #[test]
    fn test_file_source_missing_file_is_io_error() {
        let source = FileSnapshotSource::new("/nonexistent/notegraph-snapshot.json");
        match source.fetch() {
            Err(FetchError::Io(_)) => {}
            other => panic!("unexpected outcome: {:?}", other.map(|_| ())),
        }
    }
}
