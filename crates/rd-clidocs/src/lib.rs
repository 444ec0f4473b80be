//! Event-driven reference documentation for providers, services and
//! operations.
//!
//! A driver walks one entity of the API description and fires the fixed
//! sequence of document-build events (title → description → synopsis →
//! options → subitems) on a [`DocEventBus`]. Independent handlers subscribe
//! to the slices they render and write ReST markup into the shared
//! [`rd_document::DocumentStructure`]; nothing couples the walk to the
//! renderers but the event vocabulary.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use rd_clidocs::driver::document_service;
//! use rd_clidocs::handlers::{entity_document, register_all};
//! use rd_clidocs::model::Service;
//! use rd_document::{RenderTarget, structure_bus};
//! use rd_events::EventBus;
//!
//! let mut bus = EventBus::new();
//! register_all(&mut bus);
//!
//! let service = Rc::new(Service {
//!     endpoint_prefix: "s3".to_owned(),
//!     documentation: "<p>Object storage.</p>".to_owned(),
//!     ..Service::default()
//! });
//! let doc = entity_document("s3", structure_bus(), RenderTarget::Man)?;
//! document_service(&mut bus, &service, &doc)?;
//! let rendered = doc.borrow_mut().flush_structure().map_err(rd_clidocs::CliDocError::Doc)?;
//! assert!(rendered.contains("Object storage."));
//! # Ok::<(), rd_clidocs::CliDocError>(())
//! ```

pub mod driver;
mod error;
pub mod event;
pub mod handlers;
pub mod model;

pub use error::CliDocError;
pub use event::{
    DocArgument, DocEvent, DocEventBus, DocEventKind, EntityKind, SharedDoc, Subject, shared_doc,
};
pub use handlers::{
    OperationDocHandler, ProviderDocHandler, SECTION_NAMES, ServiceDocHandler, entity_document,
    register_all,
};
