use thiserror::Error;

/// Errors surfaced by the text engine.
///
/// Addressing outside valid bounds is a recoverable error, never a panic.
/// Boundary conditions that are defined no-ops (deleting in an empty line,
/// moving the cursor at a document edge) do not produce errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
