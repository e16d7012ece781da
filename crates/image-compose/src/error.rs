//! Error type shared by every compositing and text operation.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("box must have exactly 4 components (left, top, right, bottom), got {len}")]
    InvalidBox { len: usize },

    #[error("failed to read font file {}: {source}", path.display())]
    FontLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid font data (only TTF/OTF supported)")]
    InvalidFont,
}

pub type Result<T, E = ComposeError> = std::result::Result<T, E>;
