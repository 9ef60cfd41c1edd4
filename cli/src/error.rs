use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read '{}': {source}", path.display())]
    ReadSource {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse variables file '{}': {source}", path.display())]
    ParseVariables {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid --set '{0}': expected name=value")]
    InvalidAssignment(String),

    #[error("block {index} out of range: document has {count} block(s)")]
    BlockOutOfRange { index: usize, count: usize },

    #[error("cannot serialize output: {0}")]
    Json(#[from] serde_json::Error),
}
