use crate::error::{Result, ScoreboardError};
use crate::store::subscription::{wait_unless_cancelled, Subscription};
use crate::store::{ErrorCallback, RatingStore, SnapshotCallback};
use crate::types::config::ScoreboardConfig;
use crate::types::rating::{NameLookup, ProjectId, RatingEvent, Timestamp};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, trace, warn};
use walkdir::WalkDir;

const DOCUMENT_EXTENSION: &str = "json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectDocument {
    team_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatingDocument {
    project_id: String,
    criterion_id: i64,
    score: f64,
    timestamp: Option<Timestamp>,
}

#[derive(Debug, Clone)]
struct Document {
    id: String,
    path: PathBuf,
    bytes: Vec<u8>,
}

/// Store laid out as one directory per collection, one `<id>.json` file per document.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    projects: String,
    ratings: String,
    poll_interval: Duration,
}

impl FileStore {
    pub fn open(root: &Path, config: &ScoreboardConfig) -> Result<Self> {
        if !root.is_dir() {
            return Err(ScoreboardError::StoreNotFound(root.display().to_string()));
        }
        Ok(Self {
            root: root.to_path_buf(),
            projects: config.projects_collection().to_string(),
            ratings: config.ratings_collection().to_string(),
            poll_interval: config.poll_interval(),
        })
    }

    /// Current ratings collection, read once.
    pub fn read_ratings(&self) -> Result<Vec<RatingEvent>> {
        let documents = read_collection(&self.root.join(&self.ratings))?;
        Ok(parse_ratings(&documents))
    }
}

impl RatingStore for FileStore {
    fn load_project_names(&self) -> Result<NameLookup> {
        let documents = read_collection(&self.root.join(&self.projects))?;
        let mut names = NameLookup::new();
        for document in &documents {
            match serde_json::from_slice::<ProjectDocument>(&document.bytes) {
                Ok(ProjectDocument {
                    team_name: Some(name),
                }) if !name.is_empty() => {
                    names.insert(ProjectId::new(document.id.clone()), name);
                }
                Ok(_) => {
                    debug!(project = %document.id, "project has no teamName");
                }
                Err(err) => {
                    warn!(path = %document.path.display(), error = %err, "skipping malformed project");
                }
            }
        }
        info!(projects = names.len(), "loaded project names");
        Ok(names)
    }

    fn subscribe_ratings(
        &self,
        mut on_snapshot: SnapshotCallback,
        mut on_error: ErrorCallback,
    ) -> Result<Subscription> {
        let collection = self.root.join(&self.ratings);
        let interval = self.poll_interval;
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let worker = thread::Builder::new()
            .name("ratings-subscription".to_string())
            .spawn(move || {
                let mut last_fingerprint: Option<String> = None;
                while !flag.load(Ordering::SeqCst) {
                    match read_collection(&collection) {
                        Ok(documents) => {
                            let fingerprint = fingerprint(&documents);
                            if last_fingerprint.as_deref() != Some(fingerprint.as_str()) {
                                trace!(%fingerprint, "ratings collection changed");
                                let events = parse_ratings(&documents);
                                if flag.load(Ordering::SeqCst) {
                                    break;
                                }
                                on_snapshot(events);
                                last_fingerprint = Some(fingerprint);
                            }
                        }
                        Err(err) => {
                            if !flag.load(Ordering::SeqCst) {
                                on_error(err);
                            }
                            break;
                        }
                    }
                    wait_unless_cancelled(&flag, interval);
                }
                debug!("ratings subscription worker exiting");
            })?;

        info!(
            collection = %self.ratings,
            interval_ms = interval.as_millis() as u64,
            "subscribed to ratings"
        );
        Ok(Subscription::new(cancelled, worker))
    }
}

fn read_collection(dir: &Path) -> Result<Vec<Document>> {
    if !dir.is_dir() {
        return Err(ScoreboardError::CollectionUnavailable(
            dir.display().to_string(),
        ));
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        // Only the collection itself failing is fatal; a document can vanish mid-listing.
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                debug!(error = %err, "skipping unreadable collection entry");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION)
        {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let Some(bytes) = read_document(path) else {
            continue;
        };
        documents.push(Document {
            id: id.to_string(),
            path: path.to_path_buf(),
            bytes,
        });
    }
    Ok(documents)
}

fn read_document(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "document removed before it was read");
            None
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "skipping unreadable document");
            None
        }
    }
}

fn parse_ratings(documents: &[Document]) -> Vec<RatingEvent> {
    documents
        .iter()
        .filter_map(|document| {
            match serde_json::from_slice::<RatingDocument>(&document.bytes) {
                Ok(rating) => Some(RatingEvent {
                    id: document.id.clone(),
                    project_id: ProjectId::new(rating.project_id),
                    criterion_id: rating.criterion_id,
                    score: rating.score,
                    timestamp: rating.timestamp,
                }),
                Err(err) => {
                    let err = ScoreboardError::MalformedDocument(
                        document.path.display().to_string(),
                        err.to_string(),
                    );
                    warn!(error = %err, "skipping rating");
                    None
                }
            }
        })
        .collect()
}

fn fingerprint(documents: &[Document]) -> String {
    let mut hasher = Sha256::new();
    for document in documents {
        hasher.update(document.id.as_bytes());
        hasher.update([0u8]);
        hasher.update((document.bytes.len() as u64).to_le_bytes());
        hasher.update(&document.bytes);
    }
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::mpsc;
    use tempfile::TempDir;

    const WAIT: Duration = Duration::from_secs(5);

    fn fast_config() -> ScoreboardConfig {
        toml::from_str(
            r#"
[store]
poll_interval_ms = 10
"#,
        )
        .expect("config should parse")
    }

    fn store_dir() -> TempDir {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::create_dir_all(dir.path().join("projects")).expect("projects should create");
        fs::create_dir_all(dir.path().join("ratings")).expect("ratings should create");
        dir
    }

    fn write_doc(root: &Path, collection: &str, id: &str, body: &str) {
        let dir = root.join(collection);
        let staged = dir.join(format!("{id}.staged"));
        fs::write(&staged, body).expect("document should write");
        fs::rename(&staged, dir.join(format!("{id}.json"))).expect("document should publish");
    }

    #[test]
    fn open_rejects_missing_root() {
        let dir = TempDir::new().expect("temp dir should be created");
        let err = FileStore::open(&dir.path().join("missing"), &ScoreboardConfig::default())
            .expect_err("missing store should fail");
        assert!(err.to_string().contains("store not found"));
    }

    #[test]
    fn load_project_names_skips_unnamed_and_malformed_projects() {
        let dir = store_dir();
        write_doc(dir.path(), "projects", "p1", r#"{"teamName": "Alpha"}"#);
        write_doc(dir.path(), "projects", "p2", r#"{"members": 3}"#);
        write_doc(dir.path(), "projects", "p3", "{not json");
        fs::write(dir.path().join("projects/notes.txt"), "ignored").expect("note should write");

        let store = FileStore::open(dir.path(), &ScoreboardConfig::default())
            .expect("store should open");
        let names = store.load_project_names().expect("names should load");
        assert_eq!(names.len(), 1);
        assert_eq!(
            names.get(&ProjectId::new("p1")).map(String::as_str),
            Some("Alpha")
        );
    }

    #[test]
    fn load_project_names_treats_empty_team_name_as_missing() {
        let dir = store_dir();
        write_doc(dir.path(), "projects", "p1", r#"{"teamName": ""}"#);

        let store = FileStore::open(dir.path(), &ScoreboardConfig::default())
            .expect("store should open");
        let names = store.load_project_names().expect("names should load");
        assert!(names.is_empty());
        assert_eq!(
            crate::aggregate::display_name(&ProjectId::new("p1"), &names),
            "Project p1"
        );
    }

    #[test]
    fn load_project_names_fails_without_collection() {
        let dir = TempDir::new().expect("temp dir should be created");
        let store = FileStore::open(dir.path(), &ScoreboardConfig::default())
            .expect("store should open");
        assert!(matches!(
            store.load_project_names(),
            Err(ScoreboardError::CollectionUnavailable(_))
        ));
    }

    #[test]
    fn read_ratings_parses_documents_in_file_name_order() {
        let dir = store_dir();
        write_doc(
            dir.path(),
            "ratings",
            "b",
            r#"{"projectId": "p2", "criterionId": 2, "score": 3, "timestamp": {"seconds": 20, "nanoseconds": 0}}"#,
        );
        write_doc(
            dir.path(),
            "ratings",
            "a",
            r#"{"projectId": "p1", "criterionId": 1, "score": 4.5}"#,
        );
        write_doc(
            dir.path(),
            "ratings",
            "c",
            r#"{"projectId": "p1", "criterionId": 1, "score": "high"}"#,
        );

        let store = FileStore::open(dir.path(), &ScoreboardConfig::default())
            .expect("store should open");
        let events = store.read_ratings().expect("ratings should read");
        assert_eq!(
            events,
            vec![
                RatingEvent::new("a", "p1", 1, 4.5, None),
                RatingEvent::new("b", "p2", 2, 3.0, Some(20)),
            ]
        );
    }

    #[test]
    fn read_document_skips_vanished_file() {
        let dir = store_dir();
        assert!(read_document(&dir.path().join("ratings/gone.json")).is_none());
    }

    #[test]
    fn subscription_survives_document_churn() {
        let dir = store_dir();
        for index in 0..50 {
            write_doc(
                dir.path(),
                "ratings",
                &format!("r{index:03}"),
                r#"{"projectId": "p1", "criterionId": 1, "score": 1}"#,
            );
        }
        let config: ScoreboardConfig = toml::from_str(
            r#"
[store]
poll_interval_ms = 1
"#,
        )
        .expect("config should parse");
        let store = FileStore::open(dir.path(), &config).expect("store should open");

        let (snapshot_tx, snapshot_rx) = mpsc::channel();
        let (error_tx, error_rx) = mpsc::channel();
        let subscription = store
            .subscribe_ratings(
                Box::new(move |events| {
                    let _ = snapshot_tx.send(events.len());
                }),
                Box::new(move |err| {
                    let _ = error_tx.send(err.to_string());
                }),
            )
            .expect("subscription should start");
        snapshot_rx.recv_timeout(WAIT).expect("initial snapshot");

        let churned = dir.path().join("ratings");
        let deadline = std::time::Instant::now() + Duration::from_millis(500);
        let mut index = 0;
        while std::time::Instant::now() < deadline {
            let path = churned.join(format!("r{:03}.json", index % 50));
            fs::remove_file(&path).expect("document should be removed");
            fs::write(&path, r#"{"projectId": "p1", "criterionId": 2, "score": 2}"#)
                .expect("document should be rewritten");
            index += 1;
        }

        assert!(error_rx.try_recv().is_err(), "churn must not end the subscription");
        assert!(snapshot_rx.try_iter().count() > 0, "changes should keep arriving");
        assert!(subscription.is_active());
        subscription.unsubscribe();
    }

    #[test]
    fn fingerprint_tracks_content_changes() {
        let doc = |bytes: &str| Document {
            id: "a".to_string(),
            path: PathBuf::from("a.json"),
            bytes: bytes.as_bytes().to_vec(),
        };
        assert_eq!(fingerprint(&[doc("1")]), fingerprint(&[doc("1")]));
        assert_ne!(fingerprint(&[doc("1")]), fingerprint(&[doc("2")]));
        assert_ne!(fingerprint(&[]), fingerprint(&[doc("1")]));
    }

    #[test]
    fn subscription_delivers_initial_and_changed_snapshots() {
        let dir = store_dir();
        write_doc(
            dir.path(),
            "ratings",
            "r1",
            r#"{"projectId": "p1", "criterionId": 1, "score": 4}"#,
        );
        let store = FileStore::open(dir.path(), &fast_config()).expect("store should open");

        let (tx, rx) = mpsc::channel();
        let subscription = store
            .subscribe_ratings(
                Box::new(move |events| {
                    let _ = tx.send(events.len());
                }),
                Box::new(|_| {}),
            )
            .expect("subscription should start");

        assert_eq!(rx.recv_timeout(WAIT).expect("initial snapshot"), 1);

        write_doc(
            dir.path(),
            "ratings",
            "r2",
            r#"{"projectId": "p1", "criterionId": 2, "score": 3}"#,
        );
        assert_eq!(rx.recv_timeout(WAIT).expect("changed snapshot"), 2);

        subscription.unsubscribe();
        subscription.unsubscribe();
        write_doc(
            dir.path(),
            "ratings",
            "r3",
            r#"{"projectId": "p1", "criterionId": 3, "score": 3}"#,
        );
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn subscription_reports_missing_collection_once() {
        let dir = TempDir::new().expect("temp dir should be created");
        let store = FileStore::open(dir.path(), &fast_config()).expect("store should open");

        let (tx, rx) = mpsc::channel();
        let _subscription = store
            .subscribe_ratings(
                Box::new(|_| {}),
                Box::new(move |err| {
                    let _ = tx.send(err.to_string());
                }),
            )
            .expect("subscription should start");

        let message = rx.recv_timeout(WAIT).expect("error should be reported");
        assert!(message.contains("collection unavailable"));
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
