//! The one kind of error that aborts the pipeline.
//!
//! Parse errors never live here — they are [`Diagnostic`][crate::diagnostic::Diagnostic]s,
//! reported alongside signals while parsing continues (§7 of the design).
//! Only a failure of the byte source itself, or a host misusing the API, is
//! terminal.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The byte source reported an I/O error. Propagated out of the pipeline
    /// unchanged.
    #[error("byte source error: {0}")]
    Source(#[from] std::io::Error),

    /// A host-supplied `context` option named an element that isn't a valid
    /// HTML fragment context.
    #[error("invalid fragment context element: {0}")]
    InvalidContext(String),
}

pub type Result<T> = std::result::Result<T, Error>;
