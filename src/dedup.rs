//! Suppresses reports that are byte-identical to the last delivered one.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Durable key-value storage for the last delivered text of each report kind.
pub trait SnapshotStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, text: &str) -> Result<()>;
}

/// One `<key>.txt` file per report kind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.txt"))
    }
}

impl SnapshotStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::Store { path, source }),
        }
    }

    fn write(&mut self, key: &str, text: &str) -> Result<()> {
        let path = self.path(key);
        fs::create_dir_all(&self.dir).map_err(|source| Error::Store {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, text).map_err(|source| Error::Store { path, source })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl SnapshotStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, text: &str) -> Result<()> {
        self.values.insert(key.to_string(), text.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Dashboard,
    QueueListing,
    UserListing,
}

impl ReportKind {
    pub fn key(self) -> &'static str {
        match self {
            ReportKind::Dashboard => "dashboard",
            ReportKind::QueueListing => "queue",
            ReportKind::UserListing => "user",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Changed,
    Unchanged,
}

pub struct ChangeDetector<S> {
    store: S,
}

impl<S: SnapshotStore> ChangeDetector<S> {
    pub fn new(store: S) -> Self {
        ChangeDetector { store }
    }

    /// Exact comparison against the last committed text.
    pub fn check(&self, kind: ReportKind, text: &str) -> Result<Change> {
        match self.store.read(kind.key())? {
            Some(previous) if previous == text => Ok(Change::Unchanged),
            _ => Ok(Change::Changed),
        }
    }

    /// Record `text` as delivered. Call only after delivery succeeded so a failed
    /// post is retried on the next cycle.
    pub fn commit(&mut self, kind: ReportKind, text: &str) -> Result<()> {
        self.store.write(kind.key(), text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_report_is_a_change() {
        let detector = ChangeDetector::new(MemoryStore::default());
        assert_eq!(
            detector.check(ReportKind::QueueListing, "x").unwrap(),
            Change::Changed
        );
    }

    #[test]
    fn identical_text_is_suppressed_and_one_byte_is_not() {
        let mut detector = ChangeDetector::new(MemoryStore::default());
        detector.commit(ReportKind::QueueListing, "queue a").unwrap();
        assert_eq!(
            detector.check(ReportKind::QueueListing, "queue a").unwrap(),
            Change::Unchanged
        );
        assert_eq!(
            detector.check(ReportKind::QueueListing, "queue b").unwrap(),
            Change::Changed
        );
        assert_eq!(
            detector.check(ReportKind::QueueListing, "queue a\n").unwrap(),
            Change::Changed
        );
    }

    #[test]
    fn kinds_are_tracked_separately() {
        let mut detector = ChangeDetector::new(MemoryStore::default());
        detector.commit(ReportKind::QueueListing, "same").unwrap();
        assert_eq!(
            detector.check(ReportKind::UserListing, "same").unwrap(),
            Change::Changed
        );
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("qwatch_dedup_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let mut store = FileStore::new(&dir);
        assert_eq!(store.read("user").unwrap(), None);
        store.write("user", "listing").unwrap();

        let reopened = ChangeDetector::new(FileStore::new(&dir));
        assert_eq!(
            reopened.check(ReportKind::UserListing, "listing").unwrap(),
            Change::Unchanged
        );
        assert!(dir.join("user.txt").exists());
        let _ = fs::remove_dir_all(&dir);
    }
}
