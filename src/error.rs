use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions raised by the simulation engine.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum EngineError {
    /// Every cell of the grid is covered by a snake or a wall.
    #[error("no free cell left for food on the {tile_count}x{tile_count} grid")]
    GridFull { tile_count: u16 },
}

/// Problems loading or validating an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
