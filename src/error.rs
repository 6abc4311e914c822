use std::path::PathBuf;

use thiserror::Error;

/// Reasons a level definition could not be built
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not read level file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("level {level} has no definition")]
    Missing { level: u32 },
    #[error("level definition is empty")]
    Empty,
    #[error("line {line}: `{token}` is not a non-negative integer")]
    Malformed { line: usize, token: String },
    #[error("line {line}: expected {expected} entries, found {found}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("boss level expects a single lives value, found {found} entries")]
    BossShape { found: usize },
    #[error("boss must start with at least one life")]
    LifelessBoss,
}
