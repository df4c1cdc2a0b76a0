use std::path::PathBuf;

use thiserror::Error;

use crate::document::StructureError;

#[derive(Debug, Error)]
pub enum Error {
    /// The document changed shape under an expansion; the tree is corrupt.
    #[error("failed to expand `{token}`: {source}")]
    Expansion {
        token: String,
        #[source]
        source: StructureError,
    },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{0}")]
    Render(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
