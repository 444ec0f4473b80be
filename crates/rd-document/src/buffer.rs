//! Section text buffer and the shared word-translation map.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::style::RenderTarget;

/// Word-substitution table consulted while ingesting doc-strings.
///
/// Cloning yields another handle to the *same* table: a child section created
/// from a parent shares the parent's map, so entries the parent adds later
/// are visible to the child. That aliasing is an invariant, not an accident —
/// drivers seed the map once per document and every section picks it up.
#[derive(Clone, Debug, Default)]
pub struct TranslationMap {
    words: Rc<RefCell<HashMap<String, String>>>,
}

impl TranslationMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `word` to `replacement` for every holder of this handle.
    pub fn insert(&self, word: impl Into<String>, replacement: impl Into<String>) {
        self.words
            .borrow_mut()
            .insert(word.into(), replacement.into());
    }

    /// Translate one word, returning it unchanged when unmapped.
    #[must_use]
    pub fn translate(&self, word: &str) -> String {
        self.words
            .borrow()
            .get(word)
            .cloned()
            .unwrap_or_else(|| word.to_owned())
    }

    /// Number of mapped words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.borrow().len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.borrow().is_empty()
    }
}

/// Append-only text buffer of one document section.
///
/// Content is kept as an ordered list of fragments rather than one string so
/// a doc-string feed can be undone by truncating back to a fragment mark.
#[derive(Debug)]
pub struct SectionBuffer {
    writes: Vec<String>,
    keep_data: bool,
    do_translation: bool,
    translation_map: TranslationMap,
    hrefs: Vec<(String, String)>,
    target: RenderTarget,
}

impl SectionBuffer {
    /// Create an empty buffer for the given target, sharing `translation_map`.
    #[must_use]
    pub fn new(target: RenderTarget, translation_map: TranslationMap) -> Self {
        Self {
            writes: Vec::new(),
            keep_data: true,
            do_translation: false,
            translation_map,
            hrefs: Vec::new(),
            target,
        }
    }

    /// Append a fragment. Dropped while the discard-data flag is set.
    pub fn write(&mut self, content: impl Into<String>) {
        if self.keep_data {
            self.writes.push(content.into());
        }
    }

    /// Append a fragment followed by a newline.
    pub fn writeln(&mut self, content: &str) {
        self.write(format!("{content}\n"));
    }

    /// Concatenate everything written so far.
    #[must_use]
    pub fn getvalue(&self) -> String {
        self.writes.concat()
    }

    /// Number of fragments written so far. Used as a truncation mark.
    #[must_use]
    pub fn mark(&self) -> usize {
        self.writes.len()
    }

    /// Remove the fragment range `start..end`, keeping anything written after.
    pub fn remove_range(&mut self, start: usize, end: usize) {
        let end = end.min(self.writes.len());
        if start < end {
            self.writes.drain(start..end);
        }
    }

    /// Append a fragment unconditionally, bypassing the discard-data flag.
    pub fn push_write(&mut self, content: impl Into<String>) {
        self.writes.push(content.into());
    }

    /// Remove and return the most recent fragment.
    pub fn pop_write(&mut self) -> Option<String> {
        self.writes.pop()
    }

    /// The most recent fragment, if any.
    #[must_use]
    pub fn peek_write(&self) -> Option<&str> {
        self.writes.last().map(String::as_str)
    }

    /// Whether writes are currently retained.
    #[must_use]
    pub fn keep_data(&self) -> bool {
        self.keep_data
    }

    /// Toggle retention of writes (`false` while inside a discarded span).
    pub fn set_keep_data(&mut self, keep: bool) {
        self.keep_data = keep;
    }

    /// Whether ingested words are currently looked up in the translation map.
    #[must_use]
    pub fn translation_on(&self) -> bool {
        self.do_translation
    }

    /// Toggle translation mode.
    pub fn set_translation(&mut self, on: bool) {
        self.do_translation = on;
    }

    /// Handle to the shared translation map.
    #[must_use]
    pub fn translation_map(&self) -> &TranslationMap {
        &self.translation_map
    }

    /// The render target of this document.
    #[must_use]
    pub fn target(&self) -> RenderTarget {
        self.target
    }

    pub(crate) fn set_target(&mut self, target: RenderTarget) {
        self.target = target;
    }

    /// Record an external-link target for this section.
    ///
    /// Re-adding a label updates the URL but keeps the original order slot.
    pub fn add_href(&mut self, name: impl Into<String>, link: impl Into<String>) {
        let name = name.into();
        let link = link.into();
        if let Some(existing) = self.hrefs.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = link;
        } else {
            self.hrefs.push((name, link));
        }
    }

    /// Link targets recorded on this section, in insertion order.
    #[must_use]
    pub fn hrefs(&self) -> &[(String, String)] {
        &self.hrefs
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn buffer() -> SectionBuffer {
        SectionBuffer::new(RenderTarget::Man, TranslationMap::new())
    }

    #[test]
    fn test_write_and_getvalue() {
        let mut buf = buffer();
        buf.write("foo");
        assert_eq!(buf.getvalue(), "foo");
    }

    #[test]
    fn test_writeln() {
        let mut buf = buffer();
        buf.writeln("foo");
        assert_eq!(buf.getvalue(), "foo\n");
    }

    #[test]
    fn test_discarded_writes_are_dropped() {
        let mut buf = buffer();
        buf.write("kept");
        buf.set_keep_data(false);
        buf.write("dropped");
        buf.set_keep_data(true);
        buf.write(" and kept");
        assert_eq!(buf.getvalue(), "kept and kept");
    }

    #[test]
    fn test_remove_range() {
        let mut buf = buffer();
        buf.write("a");
        let start = buf.mark();
        buf.write("b");
        buf.write("c");
        let end = buf.mark();
        buf.write("d");
        buf.remove_range(start, end);
        assert_eq!(buf.getvalue(), "ad");
    }

    #[test]
    fn test_push_pop_peek() {
        let mut buf = buffer();
        buf.push_write("one");
        buf.push_write("two");
        assert_eq!(buf.peek_write(), Some("two"));
        assert_eq!(buf.pop_write(), Some("two".to_owned()));
        assert_eq!(buf.getvalue(), "one");
    }

    #[test]
    fn test_href_insertion_order_and_update() {
        let mut buf = buffer();
        buf.add_href("b", "www.b.com");
        buf.add_href("a", "www.a.com");
        buf.add_href("b", "www.b.org");
        let hrefs: Vec<_> = buf
            .hrefs()
            .iter()
            .map(|(n, l)| (n.as_str(), l.as_str()))
            .collect();
        assert_eq!(hrefs, vec![("b", "www.b.org"), ("a", "www.a.com")]);
    }

    #[test]
    fn test_translation_map_aliasing() {
        let map = TranslationMap::new();
        let alias = map.clone();
        map.insert("InstanceId", "--instance-id");
        assert_eq!(alias.translate("InstanceId"), "--instance-id");
        assert_eq!(alias.translate("Unmapped"), "Unmapped");
    }
}
