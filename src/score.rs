use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub(crate) const APP_DIR_NAME: &str = "arena-snake";
const BEST_FILE_NAME: &str = "best.json";

/// Best result reached across sessions.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BestRecord {
    pub score: u32,
    /// Grid side length when the record was set.
    pub tile_count: u16,
}

impl BestRecord {
    /// Keeps whichever of `self` and the finished session scored higher.
    #[must_use]
    pub fn merged(self, score: u32, tile_count: u16) -> Self {
        if score > self.score {
            Self { score, tile_count }
        } else {
            self
        }
    }
}

/// Returns the platform-correct best-record path.
#[must_use]
pub fn best_record_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(BEST_FILE_NAME);
    base
}

/// Loads the best record; a missing file is a fresh install, not an error.
pub fn load_best_record() -> io::Result<BestRecord> {
    load_best_record_from_path(&best_record_path())
}

/// Saves the best record, creating parent directories when needed.
pub fn save_best_record(record: BestRecord) -> io::Result<()> {
    save_best_record_to_path(&best_record_path(), record)
}

fn load_best_record_from_path(path: &Path) -> io::Result<BestRecord> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BestRecord::default()),
        Err(e) => return Err(e),
    };

    serde_json::from_str(&raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn save_best_record_to_path(path: &Path, record: BestRecord) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&record)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;

    fs::write(path, json)
}
