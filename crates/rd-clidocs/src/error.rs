//! Error type for document builds.

use rd_document::DocError;

/// Error from driving a document build.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CliDocError {
    /// A document structure operation failed.
    #[error("document error")]
    Doc(#[from] DocError),

    /// A doc-build event handler failed.
    #[error("doc event dispatch failed")]
    Dispatch(#[from] rd_events::HandlerError),
}
