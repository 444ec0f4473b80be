//! Markup state shared by every ReST-producing operation.

/// Output flavor for the rendered document.
///
/// Controls how tables of contents and cross-references render: `Man` keeps
/// them as inline bullet lists, `Html` emits Sphinx-style directives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderTarget {
    /// Terse output for man-page generation.
    #[default]
    Man,
    /// Sphinx/HTML documentation output.
    Html,
}

/// Per-section markup state: indentation depth and paragraph behavior.
///
/// A child section copies its parent's depth at creation time and evolves
/// independently afterwards; there is no back-propagation.
#[derive(Clone, Debug)]
pub struct RstStyle {
    indentation: usize,
    indent_width: usize,
    /// Whether paragraph separators are currently emitted. Suppressed while
    /// writing a list item so its text stays on the bullet line.
    pub(crate) do_p: bool,
    /// Pending href of an open anchor, consumed by `end_a`.
    pub(crate) a_href: Option<String>,
}

impl RstStyle {
    /// Create a style at depth zero with the default 2-space indent unit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_indent_width(2)
    }

    /// Create a style with a custom indent unit width.
    #[must_use]
    pub fn with_indent_width(indent_width: usize) -> Self {
        Self {
            indentation: 0,
            indent_width,
            do_p: true,
            a_href: None,
        }
    }

    /// Current indentation depth.
    #[must_use]
    pub fn indentation(&self) -> usize {
        self.indentation
    }

    /// Set the indentation depth directly (used when a child section inherits
    /// its parent's depth).
    pub fn set_indentation(&mut self, depth: usize) {
        self.indentation = depth;
    }

    /// Increase the indentation depth by one level.
    pub fn indent(&mut self) {
        self.indentation += 1;
    }

    /// Decrease the indentation depth by one level, clamped at zero.
    ///
    /// Clamping keeps mismatched indent/dedent pairs in handler code from
    /// corrupting the depth.
    pub fn dedent(&mut self) {
        self.indentation = self.indentation.saturating_sub(1);
    }

    /// The whitespace prefix for the current depth.
    #[must_use]
    pub fn spaces(&self) -> String {
        " ".repeat(self.indentation * self.indent_width)
    }
}

impl Default for RstStyle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_spaces() {
        let mut style = RstStyle::with_indent_width(4);
        assert_eq!(style.spaces(), "");
        style.indent();
        assert_eq!(style.spaces(), "    ");
        style.indent();
        assert_eq!(style.spaces(), "        ");
        style.dedent();
        assert_eq!(style.spaces(), "    ");
        style.dedent();
        assert_eq!(style.spaces(), "");
        style.dedent();
        assert_eq!(style.spaces(), "");
    }

    #[test]
    fn test_dedent_clamps_at_zero() {
        let mut style = RstStyle::new();
        style.dedent();
        style.dedent();
        style.dedent();
        assert_eq!(style.indentation(), 0);
        style.indent();
        assert_eq!(style.spaces(), "  ");
    }
}
