use super::{
    Cursor, RewriteError, RewriteResult, RewriteStep, SelectionRange, Surface, SurfaceKind,
    clamp_to_char_boundary,
};
use crate::matcher::Trigger;

/// A linear text buffer with a byte-offset selection, like a textarea.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    selection: SelectionRange,
}

impl TextBuffer {
    /// Creates a buffer with the cursor at the end of `text`.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            selection: SelectionRange::caret(text.len()),
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> SelectionRange {
        self.selection
    }

    pub fn cursor_position(&self) -> usize {
        self.selection.end
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.select(self.selection.start, self.selection.end);
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.select(pos, pos);
    }

    pub fn select(&mut self, start: usize, end: usize) {
        self.selection = SelectionRange::new(
            clamp_to_char_boundary(&self.text, start),
            clamp_to_char_boundary(&self.text, end),
        );
    }

    /// Replaces the selection with `text` and leaves the cursor after it.
    pub fn insert_str(&mut self, text: &str) {
        let SelectionRange { start, end } = self.selection;
        self.text.replace_range(start..end, text);
        self.set_cursor(start + text.len());
    }

    pub fn backspace(&mut self) {
        let SelectionRange { start, end } = self.selection;
        if start != end {
            self.insert_str("");
            return;
        }
        let Some((prev, _)) = self.text[..start].char_indices().next_back() else {
            return;
        };
        self.text.replace_range(prev..start, "");
        self.set_cursor(prev);
    }
}

impl Surface for TextBuffer {
    // The live cursor survives menu interaction, so nothing is captured.
    type Anchor = ();

    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Buffer
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn cursor(&self) -> Cursor {
        if self.selection.is_empty() {
            Cursor::Collapsed(self.selection.end)
        } else {
            Cursor::Range(self.selection)
        }
    }

    fn text_before(&self) -> String {
        self.text[..self.selection.end].to_string()
    }

    fn snapshot(&self) -> Option<()> {
        Some(())
    }

    fn rewrite(
        &mut self,
        _anchor: &(),
        trigger: &Trigger,
        replacement: &str,
        step: RewriteStep,
    ) -> RewriteResult<()> {
        if !self.selection.is_empty() {
            return Err(RewriteError::RangeSelected);
        }

        let (head, tail) = self.text.split_at(self.selection.end);
        let new_head = trigger
            .replace_first(head, replacement)
            .ok_or(RewriteError::NoMatch)?;

        let mut text = new_head.clone();
        if step == RewriteStep::Commit {
            text.push(' ');
        }
        text.push_str(tail);

        self.text = text;
        self.set_cursor(new_head.len());
        Ok(())
    }
}
