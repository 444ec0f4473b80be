//! Hierarchical document structure with deferred, one-shot flushing.

use std::cell::RefCell;
use std::rc::Rc;

use rd_events::{EventBus, Topic};

use crate::buffer::{SectionBuffer, TranslationMap};
use crate::docstring;
use crate::error::DocError;
use crate::style::{RenderTarget, RstStyle};
use crate::writer::RstWriter;

/// Topic prefix of the notification fired when a section is added.
pub const ADDING_SECTION_EVENT: &str = "docs-adding-section";

/// Topic prefix of the notification fired as each node is flushed.
pub const FLUSHING_STRUCTURE_EVENT: &str = "docs-flushing-structure";

/// Shared handle to the bus carrying structural notifications.
pub type StructureBus = Rc<RefCell<EventBus<DocumentStructure>>>;

/// Create a fresh shared structural-notification bus.
#[must_use]
pub fn structure_bus() -> StructureBus {
    Rc::new(RefCell::new(EventBus::new()))
}

/// A node in the document tree: a named section owning its own text buffer,
/// markup style, link targets, and ordered child sections.
///
/// The root and every section are the same type; a child is a full structure
/// of its own. Children inherit the parent's indentation depth (copied) and
/// translation map (shared handle) at creation time. Sibling order is
/// insertion order and is the order sections render in.
///
/// Construction is append-only and deferred: any number of writes, doc-string
/// feeds and section insertions may happen in any order, and the whole tree
/// serializes exactly once through [`flush_structure`](Self::flush_structure).
#[derive(Debug)]
pub struct DocumentStructure {
    name: String,
    path: Vec<String>,
    buffer: SectionBuffer,
    style: RstStyle,
    children: Vec<DocumentStructure>,
    bus: StructureBus,
    sealed: bool,
    last_doc_string: Option<(usize, usize)>,
}

impl DocumentStructure {
    /// Create an empty root for the `Man` target.
    #[must_use]
    pub fn new(name: impl Into<String>, bus: StructureBus) -> Self {
        let name = name.into();
        Self {
            path: vec![name.clone()],
            name,
            buffer: SectionBuffer::new(RenderTarget::Man, TranslationMap::new()),
            style: RstStyle::new(),
            children: Vec::new(),
            bus,
            sealed: false,
            last_doc_string: None,
        }
    }

    /// Select the render target. Must be applied before sections are added,
    /// since children copy the target at creation time.
    #[must_use]
    pub fn with_target(mut self, target: RenderTarget) -> Self {
        self.buffer.set_target(target);
        self
    }

    /// This node's name, unique among its siblings.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ancestor names ending in this node's own name.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The render target of this document.
    #[must_use]
    pub fn target(&self) -> RenderTarget {
        self.buffer.target()
    }

    /// The markup style state of this node.
    #[must_use]
    pub fn style(&self) -> &RstStyle {
        &self.style
    }

    /// Mutable markup style state of this node.
    pub fn style_mut(&mut self) -> &mut RstStyle {
        &mut self.style
    }

    /// Handle to the translation map shared along this document's tree.
    #[must_use]
    pub fn translation_map(&self) -> &TranslationMap {
        self.buffer.translation_map()
    }

    /// Markup writer over this node's style and buffer.
    pub fn writer(&mut self) -> RstWriter<'_> {
        RstWriter::new(&mut self.style, &mut self.buffer)
    }

    /// Append raw text to this node's buffer.
    pub fn write(&mut self, content: impl Into<String>) {
        self.buffer.write(content);
    }

    /// Append raw text followed by a newline.
    pub fn writeln(&mut self, content: &str) {
        self.buffer.writeln(content);
    }

    /// Concatenate this node's own content (children excluded).
    #[must_use]
    pub fn getvalue(&self) -> String {
        self.buffer.getvalue()
    }

    /// Record an external-link target local to this node.
    pub fn add_href(&mut self, name: impl Into<String>, link: impl Into<String>) {
        self.buffer.add_href(name, link);
    }

    /// Feed a restricted-HTML doc-string through the markup writer.
    ///
    /// Best-effort: a malformed doc-string is logged at debug level and the
    /// feed abandoned; content written before the failure stays. The fragment
    /// span of a successful feed is recorded so
    /// [`remove_last_doc_string`](Self::remove_last_doc_string) can undo it.
    pub fn include_doc_string(&mut self, doc_string: &str) {
        if doc_string.is_empty() {
            return;
        }
        let start = self.buffer.mark();
        match docstring::parse(&mut self.style, &mut self.buffer, doc_string) {
            Ok(()) => {
                self.last_doc_string = Some((start, self.buffer.mark()));
            }
            Err(error) => {
                self.last_doc_string = None;
                tracing::debug!(error = %error, doc_string, "failed to parse doc string");
            }
        }
    }

    /// Undo the most recent successful doc-string feed, restoring the buffer
    /// to its pre-feed state byte for byte.
    pub fn remove_last_doc_string(&mut self) {
        if let Some((start, end)) = self.last_doc_string.take() {
            self.buffer.remove_range(start, end);
        }
    }

    /// Create a child section named `name` and return it.
    ///
    /// The child inherits this node's indentation depth, translation map
    /// handle and render target; its buffer, link targets and children start
    /// empty. A `docs-adding-section.<hyphen-joined-path>` notification fires
    /// with the new section before it is inserted.
    ///
    /// Re-adding an existing name replaces that child in its original order
    /// slot (the notification fires for the replacement as well).
    pub fn add_new_section(&mut self, name: &str) -> Result<&mut DocumentStructure, DocError> {
        let mut path = self.path.clone();
        path.push(name.to_owned());

        let mut style = RstStyle::new();
        style.set_indentation(self.style.indentation());

        let mut section = DocumentStructure {
            name: name.to_owned(),
            path,
            buffer: SectionBuffer::new(self.buffer.target(), self.buffer.translation_map().clone()),
            style,
            children: Vec::new(),
            bus: Rc::clone(&self.bus),
            sealed: false,
            last_doc_string: None,
        };

        let topic = Topic::new(format!("{ADDING_SECTION_EVENT}.{}", section.path.join("-")));
        {
            let mut bus = self
                .bus
                .try_borrow_mut()
                .map_err(|_| DocError::ReentrantDispatch)?;
            bus.emit(&topic, &mut section)?;
        }

        let slot = match self.children.iter().position(|child| child.name == name) {
            Some(index) => {
                self.children[index] = section;
                index
            }
            None => {
                self.children.push(section);
                self.children.len() - 1
            }
        };
        Ok(&mut self.children[slot])
    }

    /// Create one child section per name, in order.
    pub fn add_sections(&mut self, names: &[&str]) -> Result<(), DocError> {
        for name in names {
            self.add_new_section(name)?;
        }
        Ok(())
    }

    /// Look up a direct child section by name.
    pub fn get_section(&self, name: &str) -> Result<&DocumentStructure, DocError> {
        self.children
            .iter()
            .find(|child| child.name == name)
            .ok_or_else(|| DocError::SectionNotFound(name.to_owned()))
    }

    /// Look up a direct child section by name, mutably.
    pub fn get_section_mut(&mut self, name: &str) -> Result<&mut DocumentStructure, DocError> {
        self.children
            .iter_mut()
            .find(|child| child.name == name)
            .ok_or_else(|| DocError::SectionNotFound(name.to_owned()))
    }

    /// Remove a child section and its whole subtree.
    pub fn delete_section(&mut self, name: &str) -> Result<(), DocError> {
        match self.children.iter().position(|child| child.name == name) {
            Some(index) => {
                self.children.remove(index);
                Ok(())
            }
            None => Err(DocError::SectionNotFound(name.to_owned())),
        }
    }

    /// Iterate over direct child sections in render order.
    pub fn sections(&self) -> impl Iterator<Item = &DocumentStructure> {
        self.children.iter()
    }

    /// Serialize the whole tree into its final text, exactly once.
    ///
    /// Pre-order depth-first: each node fires its
    /// `docs-flushing-structure.<path>` notification (observers may still
    /// inject content into the node at that point), then contributes its
    /// local href block, its own content, and finally its children in
    /// insertion order. Every flushed node is sealed; a second flush of a
    /// sealed structure fails with [`DocError::AlreadyFlushed`].
    pub fn flush_structure(&mut self) -> Result<String, DocError> {
        if self.sealed {
            return Err(DocError::AlreadyFlushed);
        }
        let mut out = String::new();
        self.flush_node(&mut out)?;
        Ok(out)
    }

    fn flush_node(&mut self, out: &mut String) -> Result<(), DocError> {
        let topic = Topic::new(format!(
            "{FLUSHING_STRUCTURE_EVENT}.{}",
            self.path.join("-")
        ));
        let bus = Rc::clone(&self.bus);
        {
            let mut bus = bus
                .try_borrow_mut()
                .map_err(|_| DocError::ReentrantDispatch)?;
            bus.emit(&topic, self)?;
        }

        if !self.buffer.hrefs().is_empty() {
            out.push_str("\n\n");
            for (name, link) in self.buffer.hrefs() {
                out.push_str(&format!(".. _{name}: {link}\n"));
            }
        }
        out.push_str(&self.buffer.getvalue());
        self.sealed = true;

        for child in &mut self.children {
            child.flush_node(out)?;
        }
        Ok(())
    }
}
