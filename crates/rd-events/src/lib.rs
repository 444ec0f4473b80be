//! Synchronous publish/subscribe event bus with hierarchical topics.
//!
//! Independent components cooperate on a shared task (building one document)
//! without calling each other directly: producers [`emit`](EventBus::emit)
//! named events and consumers [`register`](EventBus::register) wildcard
//! [`TopicPattern`]s for the slices they care about.
//!
//! Topics are dot-separated (`doc-title.Operation.describe-instances`);
//! patterns match segment-wise, with `*` standing in for exactly one segment
//! and shorter patterns matching hierarchically as prefixes.
//!
//! # Example
//!
//! ```
//! use rd_events::{EventBus, Topic};
//!
//! let mut bus: EventBus<Vec<String>> = EventBus::new();
//! bus.register("doc-title.*", |topic, titles: &mut Vec<String>| {
//!     titles.push(topic.to_string());
//!     Ok(())
//! });
//!
//! let mut titles = Vec::new();
//! bus.emit(&Topic::new("doc-title.Service.s3"), &mut titles).unwrap();
//! assert_eq!(titles, vec!["doc-title.Service.s3"]);
//! ```

mod bus;
mod topic;

pub use bus::{BoxError, EventBus, HandlerError, HandlerResult};
pub use topic::{Topic, TopicPattern};
