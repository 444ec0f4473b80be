//! ReST document structure, markup style and doc-string ingestion.
//!
//! The heart of the documentation engine: a [`DocumentStructure`] is a tree
//! of named sections, each owning its own text buffer, link targets and
//! [`RstStyle`] markup state. Independent producers write into their sections
//! in any order; the tree is serialized exactly once by
//! [`flush_structure`](DocumentStructure::flush_structure), which walks it
//! depth-first in insertion order.
//!
//! Structural notifications (`docs-adding-section.<path>`,
//! `docs-flushing-structure.<path>`) are published on a shared
//! [`rd_events::EventBus`], so external observers can react to sections being
//! created or inject content into a section right before it is flushed.
//!
//! # Example
//!
//! ```
//! use rd_document::{DocumentStructure, structure_bus};
//!
//! let mut doc = DocumentStructure::new("ec2", structure_bus());
//! doc.add_new_section("description")?
//!     .include_doc_string("<p>Describes <code>instances</code>.</p>");
//! let rendered = doc.flush_structure()?;
//! assert!(rendered.contains("``instances``"));
//! # Ok::<(), rd_document::DocError>(())
//! ```

mod buffer;
mod docstring;
mod error;
mod structure;
mod style;
mod writer;

pub use buffer::{SectionBuffer, TranslationMap};
pub use error::{DocError, DocStringError};
pub use structure::{
    ADDING_SECTION_EVENT, DocumentStructure, FLUSHING_STRUCTURE_EVENT, StructureBus, structure_bus,
};
pub use style::{RenderTarget, RstStyle};
pub use writer::RstWriter;
