//! The durable set of order ids that the relay has finished with.
use std::{
    collections::HashSet,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::{
    reporter::{LogLevel, RelayReporter},
    traits::{PersistenceError, ProcessedStore},
};

/// Order ids that will never be reconsidered: replicated successfully, or skipped for good.
///
/// The set only grows. There is no way to remove an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedSet {
    ids: HashSet<String>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the id was not already present.
    pub fn insert<S: Into<String>>(&mut self, order_id: S) -> bool {
        self.ids.insert(order_id.into())
    }

    pub fn contains(&self, order_id: &str) -> bool {
        self.ids.contains(order_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The ids in lexicographic order, so persisted files are stable between saves.
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut ids = self.ids.iter().cloned().collect::<Vec<String>>();
        ids.sort();
        ids
    }
}

impl<S: Into<String>> FromIterator<S> for ProcessedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { ids: iter.into_iter().map(Into::into).collect() }
    }
}

/// Stores the processed set as a JSON array of strings in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProcessedStore for JsonFileStore {
    fn load(&self) -> Result<ProcessedSet, PersistenceError> {
        if !self.path.exists() {
            return Ok(ProcessedSet::new());
        }
        let data = fs::read_to_string(&self.path)?;
        let ids = serde_json::from_str::<Vec<String>>(&data)
            .map_err(|e| PersistenceError::Corrupt(format!("{}: {e}", self.path.display())))?;
        Ok(ids.into_iter().collect())
    }

    fn save(&self, processed: &ProcessedSet) -> Result<(), PersistenceError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let json = serde_json::to_string(&processed.to_sorted_vec())
            .map_err(|e| PersistenceError::Io(format!("Could not serialize processed orders. {e}")))?;
        // Write next to the target and rename over it, so a crash mid-write leaves the previous file intact.
        let mut file = NamedTempFile::new_in(&dir)?;
        file.write_all(json.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| PersistenceError::Io(e.error.to_string()))?;
        Ok(())
    }
}

/// Loads the processed set, falling back to an empty set on any failure. Never fails.
pub fn load_or_default<P: ProcessedStore + ?Sized>(store: &P, reporter: &dyn RelayReporter) -> ProcessedSet {
    match store.load() {
        Ok(set) => {
            reporter.log(LogLevel::Debug, &format!("💾️ Loaded {} processed orders", set.len()));
            set
        },
        Err(PersistenceError::Corrupt(e)) => {
            reporter.log(
                LogLevel::Error,
                &format!("💾️ The processed orders file is corrupt or empty ({e}). Starting with an empty set."),
            );
            ProcessedSet::new()
        },
        Err(e) => {
            reporter.log(LogLevel::Error, &format!("💾️ Could not load processed orders. {e}"));
            ProcessedSet::new()
        },
    }
}

/// Saves the processed set, logging rather than propagating any failure. Returns true if the save succeeded.
pub fn save_or_log<P: ProcessedStore + ?Sized>(
    store: &P,
    processed: &ProcessedSet,
    reporter: &dyn RelayReporter,
) -> bool {
    match store.save(processed) {
        Ok(()) => {
            reporter.log(LogLevel::Debug, &format!("💾️ Saved {} processed orders", processed.len()));
            true
        },
        Err(e) => {
            reporter.log(LogLevel::Error, &format!("💾️ Could not save processed orders. {e}"));
            false
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::RecordingReporter;

    #[test]
    fn missing_file_is_an_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("processed.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("processed.json"));
        let set = ["B-02", "A-01"].into_iter().collect::<ProcessedSet>();
        store.save(&set).unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"["A-01","B-02"]"#);
        assert_eq!(store.load().unwrap(), set);
    }

    #[test]
    fn save_overwrites_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("processed.json"));
        store.save(&["A"].into_iter().collect()).unwrap();
        store.save(&["A", "B"].into_iter().collect()).unwrap();
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn corrupt_file_loads_as_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed.json");
        fs::write(&path, "[\"A\", ").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(PersistenceError::Corrupt(_))));
        let reporter = RecordingReporter::default();
        let set = load_or_default(&store, &reporter);
        assert!(set.is_empty());
        assert_eq!(reporter.count_at(LogLevel::Error), 1);
    }

    #[test]
    fn empty_file_loads_as_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed.json");
        fs::write(&path, "").unwrap();
        let reporter = RecordingReporter::default();
        assert!(load_or_default(&JsonFileStore::new(&path), &reporter).is_empty());
    }

    #[test]
    fn failed_save_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("no_such_dir").join("processed.json"));
        let reporter = RecordingReporter::default();
        assert!(!save_or_log(&store, &["A"].into_iter().collect(), &reporter));
        assert_eq!(reporter.count_at(LogLevel::Error), 1);
    }

    #[test]
    fn set_only_grows() {
        let mut set = ProcessedSet::new();
        assert!(set.insert("A"));
        assert!(!set.insert("A"));
        assert!(set.contains("A"));
        assert_eq!(set.len(), 1);
    }
}
