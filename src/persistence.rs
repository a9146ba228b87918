//! JSON snapshot files with atomic replace.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::PersistenceError;
use crate::snapshot::PracticeSnapshot;

/// Write `snapshot` as pretty JSON, replacing `path` atomically
pub fn save_snapshot(path: &Path, snapshot: &PracticeSnapshot) -> Result<(), PersistenceError> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        serde_json::to_writer_pretty(&mut writer, snapshot)?;
        writer.flush()?;
    }
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|err| err.error)?;

    info!(
        path = %path.display(),
        items = snapshot.items.len(),
        pairs = snapshot.history.len(),
        "practice state saved"
    );
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<PracticeSnapshot, PersistenceError> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: PracticeSnapshot = serde_json::from_reader(reader)?;

    info!(
        path = %path.display(),
        items = snapshot.items.len(),
        pairs = snapshot.history.len(),
        "practice state loaded"
    );
    Ok(snapshot)
}

/// Like [`load_snapshot`], but a missing file yields an empty snapshot
pub fn load_snapshot_or_default(path: &Path) -> Result<PracticeSnapshot, PersistenceError> {
    match load_snapshot(path) {
        Err(PersistenceError::Io(err)) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no saved practice state, starting empty");
            Ok(PracticeSnapshot::default())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryLedger;
    use crate::items::ItemStore;
    use crate::types::PairKey;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("changes.json");

        let mut store = ItemStore::new();
        store.add_item("A").unwrap();
        store.add_item("E").unwrap();
        let mut ledger = HistoryLedger::new();
        ledger.record(PairKey::new("A", "E").unwrap(), 31);
        let snapshot = PracticeSnapshot::capture(&store, &ledger);

        save_snapshot(&path, &snapshot).unwrap();
        assert_eq!(load_snapshot(&path).unwrap(), snapshot);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        assert!(matches!(load_snapshot(&path), Err(PersistenceError::Io(_))));
        assert_eq!(
            load_snapshot_or_default(&path).unwrap(),
            PracticeSnapshot::default()
        );
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_snapshot(&path), Err(PersistenceError::Json(_))));
    }
}
