//! ReST markup operations over a section buffer.

use crate::buffer::SectionBuffer;
use crate::style::{RenderTarget, RstStyle};

/// Borrow-splitting view combining a section's markup state and its buffer.
///
/// Every semantic markup request (headings, inline styles, lists, literal
/// blocks, tables of contents) goes through this type; it is the only writer
/// of ReST syntax. `start_*`/`end_*` pairs must be balanced by the caller.
pub struct RstWriter<'a> {
    style: &'a mut RstStyle,
    buffer: &'a mut SectionBuffer,
}

impl<'a> RstWriter<'a> {
    /// Create a writer over a style/buffer pair.
    pub fn new(style: &'a mut RstStyle, buffer: &'a mut SectionBuffer) -> Self {
        Self { style, buffer }
    }

    /// Append raw text.
    pub fn write(&mut self, content: impl Into<String>) {
        self.buffer.write(content);
    }

    /// Append raw text followed by a newline.
    pub fn writeln(&mut self, content: &str) {
        self.buffer.writeln(content);
    }

    /// Increase the indentation depth.
    pub fn indent(&mut self) {
        self.style.indent();
    }

    /// Decrease the indentation depth (clamped at zero).
    pub fn dedent(&mut self) {
        self.style.dedent();
    }

    /// The whitespace prefix for the current depth.
    #[must_use]
    pub fn spaces(&self) -> String {
        self.style.spaces()
    }

    /// Whether translation mode is currently on.
    #[must_use]
    pub fn translation_on(&self) -> bool {
        self.buffer.translation_on()
    }

    /// Handle to the buffer's shared translation map.
    #[must_use]
    pub fn translation_map(&self) -> &crate::buffer::TranslationMap {
        self.buffer.translation_map()
    }

    /// Start a new paragraph: blank-line separator plus current indentation.
    ///
    /// Suppressed while a list item is open.
    pub fn new_paragraph(&mut self) {
        if self.style.do_p {
            self.buffer.write(format!("\n\n{}", self.style.spaces()));
        }
    }

    /// Break the current line, keeping the paragraph open.
    pub fn new_line(&mut self) {
        if self.style.do_p {
            self.buffer.write(format!("\n{}", self.style.spaces()));
        }
    }

    fn heading(&mut self, text: &str, border: char) {
        let line: String = std::iter::repeat_n(border, text.chars().count()).collect();
        self.new_paragraph();
        self.buffer.write(format!("{line}\n{text}\n{line}"));
        self.new_paragraph();
    }

    /// Top-level heading, bordered with `*`.
    pub fn h1(&mut self, text: &str) {
        self.heading(text, '*');
    }

    /// Second-level heading, bordered with `=`.
    pub fn h2(&mut self, text: &str) {
        self.heading(text, '=');
    }

    /// Third-level heading, bordered with `-`.
    pub fn h3(&mut self, text: &str) {
        self.heading(text, '-');
    }

    /// Open inline bold.
    pub fn start_bold(&mut self) {
        self.buffer.write("**");
    }

    /// Close inline bold.
    pub fn end_bold(&mut self) {
        self.buffer.write("** ");
    }

    /// Open a `<b>` span: bold plus translation mode.
    pub fn start_b(&mut self) {
        self.buffer.set_translation(true);
        self.start_bold();
    }

    /// Close a `<b>` span.
    pub fn end_b(&mut self) {
        self.buffer.set_translation(false);
        self.buffer.write("** ");
    }

    /// Write `text` in bold. No-op on empty input.
    pub fn bold(&mut self, text: &str) {
        if !text.is_empty() {
            self.start_bold();
            self.buffer.write(text);
            self.end_bold();
        }
    }

    /// Open inline italics.
    pub fn start_italics(&mut self) {
        self.buffer.write("*");
    }

    /// Close inline italics.
    pub fn end_italics(&mut self) {
        self.buffer.write("* ");
    }

    /// Open an `<i>` span: italics plus translation mode.
    pub fn start_i(&mut self) {
        self.buffer.set_translation(true);
        self.start_italics();
    }

    /// Close an `<i>` span.
    pub fn end_i(&mut self) {
        self.buffer.set_translation(false);
        self.end_italics();
    }

    /// Write `text` in italics. No-op on empty input.
    pub fn italics(&mut self, text: &str) {
        if !text.is_empty() {
            self.start_italics();
            self.buffer.write(text);
            self.end_italics();
        }
    }

    /// Open inline code and turn translation mode on.
    pub fn start_code(&mut self) {
        self.buffer.set_translation(true);
        self.buffer.write("``");
    }

    /// Close inline code and turn translation mode off.
    pub fn end_code(&mut self) {
        self.buffer.set_translation(false);
        self.buffer.write("`` ");
    }

    /// Write `text` as inline code. No-op on empty input.
    pub fn code(&mut self, text: &str) {
        if !text.is_empty() {
            self.start_code();
            self.buffer.write(text);
            self.end_code();
        }
    }

    /// Open a paragraph tag.
    pub fn start_p(&mut self) {
        if self.style.do_p {
            self.buffer.write(format!("\n\n{}", self.style.spaces()));
        }
    }

    /// Close a paragraph tag.
    pub fn end_p(&mut self) {
        if self.style.do_p {
            self.buffer.write("\n\n");
        }
    }

    /// Open a `.. note::` admonition with an indented body.
    pub fn start_note(&mut self) {
        self.new_paragraph();
        self.buffer.write(".. note::");
        self.style.indent();
        self.new_paragraph();
    }

    /// Close a note admonition.
    pub fn end_note(&mut self) {
        self.style.dedent();
        self.new_paragraph();
    }

    /// Open a `.. warning::` admonition with an indented body.
    pub fn start_important(&mut self) {
        self.new_paragraph();
        self.buffer.write(".. warning::");
        self.style.indent();
        self.new_paragraph();
    }

    /// Close a warning admonition.
    pub fn end_important(&mut self) {
        self.style.dedent();
        self.new_paragraph();
    }

    /// Open an anchor. With an href the label is rendered as an external
    /// link; without one the anchor contributes a single space. Either way
    /// translation mode is on until [`end_a`](Self::end_a).
    pub fn start_a(&mut self, href: Option<&str>) {
        match href {
            Some(href) => {
                self.style.a_href = Some(href.to_owned());
                self.buffer.write("`");
            }
            None => self.buffer.write(" "),
        }
        self.buffer.set_translation(true);
    }

    /// Close an anchor, emitting the ``` `label <url>`_ ``` link form when an
    /// href was given.
    pub fn end_a(&mut self) {
        self.buffer.set_translation(false);
        if let Some(href) = self.style.a_href.take() {
            self.buffer.write(format!(" <{href}>"));
            self.buffer.write("`_");
        }
        self.buffer.write(" ");
    }

    /// Open a list item: line break, bullet, and paragraph breaks suppressed
    /// so the item text stays on the bullet line.
    pub fn start_li(&mut self) {
        self.new_line();
        self.style.do_p = false;
        self.buffer.write("* ");
    }

    /// Close a list item and restore paragraph breaks.
    pub fn end_li(&mut self) {
        self.style.do_p = true;
        self.new_line();
    }

    /// Write a complete list item. No-op on empty input.
    pub fn li(&mut self, text: &str) {
        if !text.is_empty() {
            self.start_li();
            self.buffer.writeln(text);
            self.end_li();
        }
    }

    /// Open an unordered list.
    pub fn start_ul(&mut self) {
        self.new_paragraph();
    }

    /// Close an unordered list.
    pub fn end_ul(&mut self) {
        self.new_paragraph();
    }

    /// Open an ordered list. Rendered with the same bullets as unordered
    /// lists; ReST renumbers on its own.
    pub fn start_ol(&mut self) {
        self.new_paragraph();
    }

    /// Close an ordered list.
    pub fn end_ol(&mut self) {
        self.new_paragraph();
    }

    /// Start discarding ingested content (`<examples>` span).
    pub fn start_examples(&mut self) {
        self.buffer.set_keep_data(false);
    }

    /// Stop discarding ingested content.
    pub fn end_examples(&mut self) {
        self.buffer.set_keep_data(true);
    }

    /// Start discarding ingested content (`<fullname>` span).
    pub fn start_fullname(&mut self) {
        self.buffer.set_keep_data(false);
    }

    /// Stop discarding ingested content.
    pub fn end_fullname(&mut self) {
        self.buffer.set_keep_data(true);
    }

    /// Open a literal block: the `::` introducer plus one indent level.
    pub fn start_codeblock(&mut self) {
        self.buffer.write("::");
        self.style.indent();
        self.new_paragraph();
    }

    /// Close a literal block.
    pub fn end_codeblock(&mut self) {
        self.style.dedent();
        self.new_paragraph();
    }

    /// Write `code` as a literal block, line by line.
    ///
    /// Literal blocks are introduced by `::` and must be indented and
    /// separated from surrounding paragraphs by blank lines. The first line
    /// lands on the indentation opened by `start_codeblock`; continuation
    /// lines carry the prefix themselves.
    pub fn codeblock(&mut self, code: &str) {
        self.start_codeblock();
        let mut lines = code.lines();
        if let Some(first) = lines.next() {
            self.buffer.writeln(first);
        }
        for line in lines {
            let prefixed = format!("{}{line}", self.style.spaces());
            self.buffer.writeln(&prefixed);
        }
        self.end_codeblock();
    }

    /// Open a table of contents: a Sphinx `.. toctree::` directive for the
    /// html target, a plain bullet list for man.
    pub fn toctree(&mut self) {
        match self.buffer.target() {
            RenderTarget::Html => {
                self.buffer.write("\n.. toctree::\n");
                self.buffer.write("  :maxdepth: 1\n");
                self.buffer.write("  :titlesonly:\n\n");
            }
            RenderTarget::Man => self.start_ul(),
        }
    }

    /// Write one table-of-contents entry: a bullet for man, an indented
    /// reference line (`file_name` when given, else `item`) for html.
    pub fn tocitem(&mut self, item: &str, file_name: Option<&str>) {
        match self.buffer.target() {
            RenderTarget::Man => self.li(item),
            RenderTarget::Html => {
                let reference = file_name.unwrap_or(item);
                self.buffer.writeln(&format!("  {reference}"));
            }
        }
    }

    /// Write a `:doc:` cross-reference to another document.
    pub fn ref_to(&mut self, title: &str, link: Option<&str>) {
        let link = link.unwrap_or(title);
        self.buffer.write(format!(":doc:`{title} <{link}>`"));
    }

    /// Write an external-link target definition line.
    pub fn link_target_definition(&mut self, refname: &str, link: &str) {
        self.buffer.writeln(&format!(".. _{refname}: {link}"));
    }
}
