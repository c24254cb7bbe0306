use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

const LOG_FILE_NAME: &str = "arena-snake.log";

/// Default log location next to the best-score file.
#[must_use]
pub fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(crate::score::APP_DIR_NAME);
    base.push(LOG_FILE_NAME);
    base
}

/// Routes the `log` facade to `path`.
///
/// The terminal is in raw mode while the game runs, so nothing is written to
/// stdout or stderr.
pub fn init_file_logger(path: &Path, level: LevelFilter) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    WriteLogger::init(level, config, File::create(path)?).map_err(io::Error::other)
}
