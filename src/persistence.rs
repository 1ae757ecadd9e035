// File: src/persistence.rs
use crate::core::dictionary::{Dictionary, DictionaryProvider};
use crate::core::types::DictionaryEntry;
use crate::Result;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const APP_DIR: &str = "swipe-type-engine";
const SNAPSHOT_FILE: &str = "dictionary.bin";

/// Per-user location of the compiled dictionary snapshot.
pub fn default_snapshot_path() -> Option<PathBuf> {
    let mut path = dirs::data_local_dir().or_else(dirs::home_dir)?;
    path.push(APP_DIR);
    path.push(SNAPSHOT_FILE);
    Some(path)
}

/// On-disk form of a compiled dictionary. Only the entries are stored; the
/// endpoint index is rebuilt (and the entries re-validated) on load.
#[derive(serde::Serialize, serde::Deserialize)]
struct SerializableSnapshot {
    entries: Vec<DictionaryEntry>,
}

/// Writes `dictionary` next to `path` and renames it into place, so a reader
/// never sees a half-written snapshot.
pub fn save_snapshot(dictionary: &Dictionary, path: &Path) -> Result<()> {
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let snapshot = SerializableSnapshot {
        entries: dictionary.entries(),
    };

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, &snapshot)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(std::io::Error::from)?;
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<Dictionary> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let snapshot: SerializableSnapshot = bincode::deserialize_from(reader)?;
    Dictionary::from_entries(snapshot.entries)
}

/// Serves a snapshot file written by `save_snapshot`.
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    path: PathBuf,
    name: String,
}

impl SnapshotProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("snapshot {}", path.display());
        Self { path, name }
    }
}

impl DictionaryProvider for SnapshotProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn entries(&self) -> Result<Vec<DictionaryEntry>> {
        Ok(self.load()?.entries())
    }

    fn load(&self) -> Result<Dictionary> {
        load_snapshot(&self.path)
    }
}
