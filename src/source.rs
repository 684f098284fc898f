//! Source buffers for parsing and diagnostics.

use std::fmt;
use std::sync::Arc;

use crate::ast::Location;

/// An immutable, optionally named source buffer.
///
/// Cloning is cheap: the text and line table are shared. The parsed
/// compilation unit and every parse error keep a handle to their source so
/// byte offsets can be resolved to line/column positions after the fact.
#[derive(Clone)]
pub struct SourceFile {
    path: Option<Arc<str>>,
    text: Arc<str>,
    line_starts: Arc<[usize]>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self::build(Some(path.into()), text.into())
    }

    /// A source with no file name, e.g. for tests or in-memory input.
    pub fn anonymous(text: impl Into<String>) -> Self {
        Self::build(None, text.into())
    }

    fn build(path: Option<String>, text: String) -> Self {
        let mut line_starts = vec![0usize];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            path: path.map(Into::into),
            text: text.into(),
            line_starts: line_starts.into(),
        }
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The path to show in diagnostics; `<input>` for anonymous sources.
    pub fn display_path(&self) -> &str {
        self.path.as_deref().unwrap_or("<input>")
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Resolve a byte offset into a 1-based line/column location.
    ///
    /// Offsets past the end of the buffer resolve to the final position.
    pub fn location(&self, offset: usize) -> Location {
        let offset = offset.min(self.text.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let column = offset - self.line_starts[line] + 1;
        Location::new(line + 1, column, offset)
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("path", &self.display_path())
            .field("len", &self.text.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_resolution() {
        let source = SourceFile::anonymous("ab\ncd\n");
        assert_eq!(source.location(0), Location::new(1, 1, 0));
        assert_eq!(source.location(1), Location::new(1, 2, 1));
        assert_eq!(source.location(3), Location::new(2, 1, 3));
        assert_eq!(source.location(4), Location::new(2, 2, 4));
        assert_eq!(source.location(100), Location::new(3, 1, 6));
    }

    #[test]
    fn display_path_defaults() {
        assert_eq!(SourceFile::anonymous("").display_path(), "<input>");
        assert_eq!(SourceFile::new("A.java", "").display_path(), "A.java");
    }
}
