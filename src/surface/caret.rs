//! Caret queries and moves over a [`Document`] selection.

use crate::dom::{Document, DomPosition, NodeId};

pub trait Caret {
    /// The focus of the selection resolved to a (text node, byte offset)
    /// pair. A focus on an element boundary resolves to the end of the text
    /// node just before it, if there is one.
    fn caret_position(&self) -> Option<DomPosition>;

    /// Text of the focused text node up to the caret. Sibling and
    /// formatting nodes are not included.
    fn text_before(&self) -> String;

    /// Collapses the selection immediately after `node`.
    fn move_after(&mut self, node: NodeId) -> bool;
}

impl Caret for Document {
    fn caret_position(&self) -> Option<DomPosition> {
        let focus = self.selection()?.focus;
        if !self.is_connected(focus.node) {
            return None;
        }

        if let Some(text) = self.text(focus.node) {
            let offset = super::clamp_to_char_boundary(text, focus.offset);
            return Some(DomPosition::new(focus.node, offset));
        }

        let before = focus.offset.checked_sub(1)?;
        let child = *self.children(focus.node).get(before)?;
        let text = self.text(child)?;
        Some(DomPosition::new(child, text.len()))
    }

    fn text_before(&self) -> String {
        self.caret_position()
            .and_then(|pos| self.text(pos.node).map(|text| text[..pos.offset].to_string()))
            .unwrap_or_default()
    }

    fn move_after(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.parent(node) else {
            return false;
        };
        let Some(index) = self.index_in_parent(node) else {
            return false;
        };
        self.collapse(parent, index + 1);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_before_in_text_node() {
        let mut doc = Document::new("div");
        let root = doc.root();
        doc.append_text(root, "one ");
        let b = doc.append_element(root, "b");
        doc.append_text(b, "two");
        let text = doc.append_text(root, " three @al");
        doc.collapse(text, 7);
        assert_eq!(doc.text_before(), " three ");
    }

    #[test]
    fn test_text_before_on_element_boundary() {
        let mut doc = Document::new("div");
        let root = doc.root();
        doc.append_text(root, "hi @al");
        doc.collapse(root, 1);
        assert_eq!(doc.text_before(), "hi @al");

        doc.collapse(root, 0);
        assert_eq!(doc.text_before(), "");
    }

    #[test]
    fn test_text_before_without_selection() {
        let doc = Document::new("div");
        assert_eq!(doc.text_before(), "");
    }

    #[test]
    fn test_move_after() {
        let mut doc = Document::new("div");
        let root = doc.root();
        let a = doc.append_text(root, "a");
        doc.append_text(root, "b");
        assert!(doc.move_after(a));
        assert_eq!(
            doc.selection().map(|s| s.focus),
            Some(DomPosition::new(root, 1))
        );

        let loose = doc.create_text("loose");
        assert!(!doc.move_after(loose));
    }
}
