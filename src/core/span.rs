//! Source files and text ranges.

use std::fmt;

pub use text_size::{TextRange, TextSize};

/// An identifier for a source file of the translation unit.
///
/// The actual path lives in whatever front end built the tree; the core
/// only ever compares and hashes files.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileId(pub u32);

impl FileId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

/// A range of text in one source file.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Span {
    pub file: FileId,
    pub range: TextRange,
}

impl Span {
    pub fn new(file: FileId, range: TextRange) -> Self {
        Self { file, range }
    }

    /// Build a span from raw offsets, mostly for tests and builders.
    pub fn of(file: FileId, start: u32, end: u32) -> Self {
        Self {
            file,
            range: TextRange::new(TextSize::new(start), TextSize::new(end)),
        }
    }

    /// The zero-width span at the start of this one. Used as the location
    /// of "unknown" cross-reference targets.
    pub fn start(self) -> Span {
        Span {
            file: self.file,
            range: TextRange::empty(self.range.start()),
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}..{}",
            self.file.0,
            u32::from(self.range.start()),
            u32::from(self.range.end())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_start_is_empty() {
        let span = Span::of(FileId::new(0), 10, 20);
        let start = span.start();
        assert_eq!(start.file, span.file);
        assert!(start.range.is_empty());
        assert_eq!(start.range.start(), span.range.start());
    }
}
