use std::{io, path::PathBuf};
use thiserror::Error;

/// Every way an embedding run can fail. None of them are recoverable, the first one aborts
/// the run.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("couldn't open input file {path:?}")]
    OpenInput { path: PathBuf, source: io::Error },
    #[error("couldn't create output file {path:?}")]
    CreateOutput { path: PathBuf, source: io::Error },
    #[error("couldn't read from {name}")]
    Read { name: String, source: io::Error },
    #[error("couldn't write the declaration of {name}")]
    Write { name: String, source: io::Error },
}
