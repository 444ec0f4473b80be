//! Error types for document construction and flushing.

/// Error from document structure operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DocError {
    /// A named section does not exist under this node.
    #[error("section not found: {0:?}")]
    SectionNotFound(String),

    /// The structure was already flushed and is sealed.
    #[error("document structure already flushed")]
    AlreadyFlushed,

    /// A structural notification handler failed.
    #[error("structural notification failed")]
    Notify(#[from] rd_events::HandlerError),

    /// A notification was emitted while the bus was already dispatching.
    #[error("event bus is already dispatching")]
    ReentrantDispatch,
}

/// Error while parsing a doc-string's restricted HTML markup.
///
/// Doc-strings originate from loosely-validated API metadata, so callers
/// treat this as a best-effort failure: the feed is logged and abandoned
/// rather than aborting the whole build.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DocStringError {
    /// The markup could not be tokenized.
    #[error("markup parse error")]
    Parse(#[from] quick_xml::Error),
}
