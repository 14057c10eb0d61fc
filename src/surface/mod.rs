//! Text surfaces the engine completes against.
//!
//! A surface answers "where is the cursor" and "what text precedes it", and
//! knows how to rewrite the matched span in its own addressing model. The
//! controller is generic over [`Surface`], so the choice between a plain
//! buffer and a rich-text document is made once, at construction.

mod buffer;
pub mod caret;
mod error;
mod rich;

pub use buffer::TextBuffer;
pub use caret::Caret;
pub use error::{RewriteError, RewriteResult};
pub use rich::RichText;

use crate::matcher::Trigger;
use std::fmt;

/// A text selection as a byte range, normalized so that `start <= end`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// The live cursor as seen by the match engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    /// Nothing is focused or the selection points outside the surface.
    Missing,
    /// A range is selected; there is no single caret position to match at.
    Range(SelectionRange),
    /// A collapsed caret at this offset.
    Collapsed(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
    Buffer,
    RichText,
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceKind::Buffer => write!(f, "buffer"),
            SurfaceKind::RichText => write!(f, "rich-text"),
        }
    }
}

/// How a rewrite continues after the matched span is replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewriteStep {
    /// Replace the span and keep completing (a "query" option).
    Continue,
    /// Replace the span with a final value and pad it with one space.
    Commit,
}

pub trait Surface {
    /// Cursor context captured at match time and replayed on rewrite.
    type Anchor: Clone + fmt::Debug;

    fn kind(&self) -> SurfaceKind;

    /// Full text of the surface, formatting nodes excluded.
    fn text(&self) -> String;

    fn cursor(&self) -> Cursor;

    /// Text immediately preceding the cursor. Empty without a cursor.
    fn text_before(&self) -> String;

    fn snapshot(&self) -> Option<Self::Anchor>;

    /// Replaces the first occurrence of `trigger` in the text preceding the
    /// anchored cursor with `replacement`, then re-anchors the cursor.
    fn rewrite(
        &mut self,
        anchor: &Self::Anchor,
        trigger: &Trigger,
        replacement: &str,
        step: RewriteStep,
    ) -> RewriteResult<()>;
}

pub(crate) fn clamp_to_char_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_range_normalizes() {
        let range = SelectionRange::new(10, 5);
        assert_eq!(range.start, 5);
        assert_eq!(range.end, 10);
        assert_eq!(range.len(), 5);
        assert!(!range.is_empty());
        assert!(SelectionRange::caret(3).is_empty());
    }

    #[test]
    fn test_clamp_to_char_boundary() {
        let s = "aé";
        assert_eq!(clamp_to_char_boundary(s, 2), 1);
        assert_eq!(clamp_to_char_boundary(s, 3), 3);
        assert_eq!(clamp_to_char_boundary(s, 99), 3);
    }
}
