use super::caret::Caret;
use super::{Cursor, RewriteError, RewriteResult, RewriteStep, SelectionRange, Surface, SurfaceKind};
use crate::dom::markup::parse_fragment;
use crate::dom::{Document, DomPosition, NodeId};
use crate::matcher::Trigger;

const NBSP: &str = "\u{a0}";

/// A rich-text editable region backed by a [`Document`].
#[derive(Debug, Clone)]
pub struct RichText {
    doc: Document,
}

impl Default for RichText {
    fn default() -> Self {
        Self::new()
    }
}

impl RichText {
    pub fn new() -> Self {
        let mut doc = Document::new("div");
        let root = doc.root();
        doc.set_attribute(root, "contenteditable", "true");
        Self { doc }
    }

    /// Builds the region from markup and puts the caret at the end of the
    /// last top-level text node.
    pub fn from_markup(markup: &str) -> Self {
        let mut surface = Self::new();
        let root = surface.doc.root();
        let nodes = surface.doc.create_fragment(&parse_fragment(markup));
        for node in nodes {
            surface.doc.append_child(root, node);
        }
        surface.place_caret_at_end();
        surface
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn markup(&self) -> String {
        self.doc.inner_markup(self.doc.root())
    }

    pub fn place_caret_at_end(&mut self) {
        let root = self.doc.root();
        let last_text = self
            .doc
            .children(root)
            .iter()
            .rev()
            .copied()
            .find(|&child| self.doc.is_text(child));
        match last_text {
            Some(node) => {
                let len = self.doc.text(node).map(str::len).unwrap_or(0);
                self.doc.collapse(node, len);
            }
            None => {
                let len = self.doc.children(root).len();
                self.doc.collapse(root, len);
            }
        }
    }

    pub fn set_caret(&mut self, node: NodeId, offset: usize) {
        self.doc.collapse(node, offset);
    }

    /// Types `text` at the caret, extending the text node it sits in or
    /// creating one at an element boundary.
    pub fn type_text(&mut self, text: &str) {
        if let Some(pos) = self.doc.caret_position() {
            let mut value = self.doc.text(pos.node).unwrap_or_default().to_string();
            value.insert_str(pos.offset, text);
            self.doc.set_text(pos.node, &value);
            self.doc.collapse(pos.node, pos.offset + text.len());
            return;
        }

        let Some(focus) = self.doc.selection().map(|s| s.focus) else {
            return;
        };
        if !self.doc.is_element(focus.node) {
            return;
        }
        let reference = self.doc.children(focus.node).get(focus.offset).copied();
        let node = self.doc.create_text(text);
        self.doc.insert_before(focus.node, node, reference);
        self.doc.collapse(node, text.len());
    }

    fn anchor_text(&self, anchor: &DomPosition) -> RewriteResult<String> {
        if !self.doc.is_connected(anchor.node) {
            return Err(RewriteError::StaleAnchor);
        }
        self.doc
            .text(anchor.node)
            .map(str::to_string)
            .ok_or(RewriteError::StaleAnchor)
    }
}

impl Surface for RichText {
    // Clicking the menu can move the live selection, so the caret is
    // captured at match time.
    type Anchor = DomPosition;

    fn kind(&self) -> SurfaceKind {
        SurfaceKind::RichText
    }

    fn text(&self) -> String {
        self.doc.own_text(self.doc.root())
    }

    fn cursor(&self) -> Cursor {
        let Some(selection) = self.doc.selection() else {
            return Cursor::Missing;
        };
        if !self.doc.is_connected(selection.focus.node) {
            return Cursor::Missing;
        }
        if selection.is_collapsed() {
            Cursor::Collapsed(selection.focus.offset)
        } else {
            Cursor::Range(SelectionRange::new(
                selection.anchor.offset,
                selection.focus.offset,
            ))
        }
    }

    fn text_before(&self) -> String {
        self.doc.text_before()
    }

    fn snapshot(&self) -> Option<DomPosition> {
        self.doc.caret_position()
    }

    fn rewrite(
        &mut self,
        anchor: &DomPosition,
        trigger: &Trigger,
        replacement: &str,
        step: RewriteStep,
    ) -> RewriteResult<()> {
        let text = self.anchor_text(anchor)?;
        let index = super::clamp_to_char_boundary(&text, anchor.offset);
        let (head, tail) = text.split_at(index);
        let span = trigger.span(head).ok_or(RewriteError::NoMatch)?;

        match step {
            RewriteStep::Continue => {
                let new_head = format!("{}{}{}", &head[..span.start], replacement, &head[span.end..]);
                self.doc
                    .set_text(anchor.node, &format!("{}{}", new_head, tail));
                self.doc.collapse(anchor.node, new_head.len());
            }
            RewriteStep::Commit => {
                let mut nodes = Vec::new();
                if span.start > 0 {
                    nodes.push(self.doc.create_text(&head[..span.start]));
                }
                nodes.extend(self.doc.create_fragment(&parse_fragment(replacement)));
                let after_match = &head[span.end..];
                if !after_match.is_empty() {
                    nodes.push(self.doc.create_text(after_match));
                }
                // Padding follows the whole rewritten head, as in the buffer.
                let padding = self.doc.create_text(NBSP);
                nodes.push(padding);
                if !tail.is_empty() {
                    nodes.push(self.doc.create_text(tail));
                }

                if !self.doc.replace_with(anchor.node, &nodes) {
                    return Err(RewriteError::StaleAnchor);
                }
                self.doc.move_after(padding);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger() -> Trigger {
        Trigger::new(r"@(\w*)$").unwrap()
    }

    #[test]
    fn test_from_markup_places_caret_at_end() {
        let surface = RichText::from_markup("hi <b>there</b> @al");
        assert_eq!(surface.text(), "hi  @al");
        assert_eq!(surface.text_before(), " @al");
        assert_eq!(surface.cursor(), Cursor::Collapsed(4));
    }

    #[test]
    fn test_type_text_extends_current_node() {
        let mut surface = RichText::from_markup("hi @a");
        surface.type_text("l");
        assert_eq!(surface.text_before(), "hi @al");
    }

    #[test]
    fn test_type_text_into_empty_region() {
        let mut surface = RichText::new();
        surface.place_caret_at_end();
        surface.type_text("@b");
        assert_eq!(surface.text_before(), "@b");
        assert_eq!(surface.markup(), "@b");
    }

    #[test]
    fn test_commit_injects_markup_and_moves_caret_past_padding() {
        let mut surface = RichText::from_markup("<i>x</i>hi @al");
        let anchor = surface.snapshot().unwrap();
        surface
            .rewrite(
                &anchor,
                &trigger(),
                r#"<span class="ac">@alice</span>"#,
                RewriteStep::Commit,
            )
            .unwrap();
        assert_eq!(
            surface.markup(),
            r#"<i>x</i>hi <span class="ac">@alice</span>&nbsp;"#
        );
        assert_eq!(surface.text_before(), "\u{a0}");
        assert_eq!(surface.cursor(), Cursor::Collapsed(4));
    }

    #[test]
    fn test_commit_keeps_text_after_the_caret() {
        let mut surface = RichText::from_markup("hi @al tail");
        let text = surface.document().children(surface.document().root())[0];
        surface.set_caret(text, 6);
        let anchor = surface.snapshot().unwrap();
        surface
            .rewrite(&anchor, &Trigger::new(r"@(\w*)").unwrap(), "@alice", RewriteStep::Commit)
            .unwrap();
        assert_eq!(surface.markup(), "hi @alice&nbsp; tail");
    }

    #[test]
    fn test_commit_pads_after_text_following_the_match() {
        let mut surface = RichText::from_markup("hi @al x");
        let anchor = surface.snapshot().unwrap();
        surface
            .rewrite(&anchor, &Trigger::new(r"@(\w*)").unwrap(), "@alice", RewriteStep::Commit)
            .unwrap();
        assert_eq!(surface.markup(), "hi @alice x&nbsp;");
        assert_eq!(surface.text_before(), "\u{a0}");
    }

    #[test]
    fn test_continue_rewrites_text_in_place() {
        let mut surface = RichText::from_markup("go @se");
        let anchor = surface.snapshot().unwrap();
        surface
            .rewrite(&anchor, &trigger(), "@search:", RewriteStep::Continue)
            .unwrap();
        assert_eq!(surface.markup(), "go @search:");
        assert_eq!(surface.text_before(), "go @search:");
    }

    #[test]
    fn test_stale_anchor_is_rejected() {
        let mut surface = RichText::from_markup("hi @al");
        let anchor = surface.snapshot().unwrap();
        surface.document_mut().detach(anchor.node);
        let err = surface
            .rewrite(&anchor, &trigger(), "@alice", RewriteStep::Commit)
            .unwrap_err();
        assert_eq!(err, RewriteError::StaleAnchor);
    }

    #[test]
    fn test_range_selection_reports_range_cursor() {
        let mut surface = RichText::from_markup("hi @al");
        let text = surface.document().children(surface.document().root())[0];
        surface.document_mut().set_selection(Some(crate::dom::DomSelection {
            anchor: DomPosition::new(text, 0),
            focus: DomPosition::new(text, 6),
        }));
        assert_eq!(surface.cursor(), Cursor::Range(SelectionRange::new(0, 6)));
    }
}
