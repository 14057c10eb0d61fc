//! The floating menu: wrapper and menu elements, option rows, and the
//! class projection of the visibility state.

use crate::dom::{Document, NodeId};
use crate::store::OptionId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Hidden,
    Shown,
}

impl Visibility {
    pub fn is_shown(self) -> bool {
        self == Visibility::Shown
    }
}

/// Class and attribute names the menu is marked up with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    pub hidden: String,
    pub menu: String,
    pub option: String,
    pub highlighted: String,
    pub id_attribute: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            hidden: "textcomplete-hidden".to_string(),
            menu: "textcomplete-menu".to_string(),
            option: "textcomplete-option".to_string(),
            highlighted: "textcomplete-highlighted".to_string(),
            id_attribute: "data-textcomplete-id".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuPosition {
    pub top: i32,
    pub left: i32,
}

#[derive(Debug, Clone)]
pub struct Menu {
    doc: Document,
    element: NodeId,
    classes: ClassNames,
    position: Option<MenuPosition>,
}

impl Menu {
    pub fn new(classes: ClassNames) -> Self {
        let mut doc = Document::new("div");
        let wrapper = doc.root();
        doc.add_class(wrapper, &classes.hidden);
        let element = doc.append_element(wrapper, "div");
        doc.add_class(element, "autocomplete");
        doc.add_class(element, &classes.menu);
        Self {
            doc,
            element,
            classes,
            position: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// The container carrying the hidden class.
    pub fn wrapper(&self) -> NodeId {
        self.doc.root()
    }

    /// The element option rows live in.
    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn classes(&self) -> &ClassNames {
        &self.classes
    }

    pub fn is_row(&self, node: NodeId) -> bool {
        self.doc.has_class(node, &self.classes.option)
    }

    /// Marks `row` as the rendering of `id` and puts it in the menu if the
    /// host has not placed it already.
    pub fn attach_row(&mut self, id: &OptionId, row: NodeId) {
        self.doc.add_class(row, &self.classes.option);
        self.doc
            .set_attribute(row, &self.classes.id_attribute, id.as_str());
        if self.doc.parent(row).is_none() {
            self.doc.append_child(self.element, row);
        }
    }

    pub fn row_id(&self, row: NodeId) -> Option<&str> {
        self.doc.attribute(row, &self.classes.id_attribute)
    }

    pub fn release(&mut self, rows: &[NodeId]) {
        for &row in rows {
            self.doc.remove_class(row, &self.classes.highlighted);
            self.doc.detach(row);
        }
    }

    /// Detaches every option row still under the menu element.
    pub fn release_all_rows(&mut self) {
        let rows: Vec<NodeId> = self
            .doc
            .children(self.element)
            .iter()
            .copied()
            .filter(|&child| self.is_row(child))
            .collect();
        self.release(&rows);
    }

    /// Rows currently in the menu, in display order.
    pub fn rows(&self) -> Vec<NodeId> {
        self.doc
            .children(self.element)
            .iter()
            .copied()
            .filter(|&child| self.is_row(child))
            .collect()
    }

    /// The option row containing `target`, if any.
    pub fn find(&self, target: NodeId) -> Option<NodeId> {
        let row = self.doc.closest(target, |doc, node| {
            doc.has_class(node, &self.classes.option)
        })?;
        self.doc.is_connected(row).then_some(row)
    }

    pub fn next_row(&self, row: NodeId) -> Option<NodeId> {
        let mut current = self.doc.next_sibling(row);
        while let Some(node) = current {
            if self.is_row(node) {
                return Some(node);
            }
            current = self.doc.next_sibling(node);
        }
        None
    }

    pub fn previous_row(&self, row: NodeId) -> Option<NodeId> {
        let mut current = self.doc.previous_sibling(row);
        while let Some(node) = current {
            if self.is_row(node) {
                return Some(node);
            }
            current = self.doc.previous_sibling(node);
        }
        None
    }

    pub fn set_position(&mut self, top: i32, left: i32) {
        self.position = Some(MenuPosition { top, left });
        self.doc.set_attribute(
            self.element,
            "style",
            &format!("top: {}px; left: {}px", top, left),
        );
    }

    pub fn position(&self) -> Option<MenuPosition> {
        self.position
    }

    /// Recomputes presentation classes from state. Classes are never read
    /// back as state.
    pub fn project(&mut self, visibility: Visibility, highlighted: Option<NodeId>, rows: &[NodeId]) {
        let wrapper = self.wrapper();
        self.doc
            .toggle_class(wrapper, &self.classes.hidden, !visibility.is_shown());
        for &row in rows {
            self.doc.toggle_class(
                row,
                &self.classes.highlighted,
                visibility.is_shown() && highlighted == Some(row),
            );
        }
    }

    pub fn is_hidden_class_set(&self) -> bool {
        self.doc.has_class(self.wrapper(), &self.classes.hidden)
    }

    pub fn is_highlighted_class_set(&self, row: NodeId) -> bool {
        self.doc.has_class(row, &self.classes.highlighted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_with_rows(n: usize) -> (Menu, Vec<NodeId>) {
        let mut menu = Menu::new(ClassNames::default());
        let mut rows = Vec::new();
        for i in 0..n {
            let row = menu.document_mut().create_element("li");
            menu.attach_row(&OptionId::from(i as u64), row);
            rows.push(row);
        }
        (menu, rows)
    }

    #[test]
    fn test_new_menu_starts_hidden() {
        let menu = Menu::new(ClassNames::default());
        assert!(menu.is_hidden_class_set());
        assert!(menu.document().has_class(menu.element(), "textcomplete-menu"));
    }

    #[test]
    fn test_attach_row_marks_and_appends() {
        let (menu, rows) = menu_with_rows(2);
        assert_eq!(menu.rows(), rows);
        assert_eq!(menu.row_id(rows[1]), Some("1"));
        assert!(menu.is_row(rows[0]));
    }

    #[test]
    fn test_row_navigation_skips_non_rows() {
        let (mut menu, rows) = menu_with_rows(2);
        let divider = menu.document_mut().create_element("hr");
        let element = menu.element();
        menu.document_mut()
            .insert_before(element, divider, Some(rows[1]));

        assert_eq!(menu.next_row(rows[0]), Some(rows[1]));
        assert_eq!(menu.previous_row(rows[1]), Some(rows[0]));
        assert_eq!(menu.next_row(rows[1]), None);
        assert_eq!(menu.previous_row(rows[0]), None);
    }

    #[test]
    fn test_find_resolves_nested_targets() {
        let (mut menu, rows) = menu_with_rows(1);
        let inner = menu.document_mut().append_element(rows[0], "b");
        let text = menu.document_mut().append_text(inner, "alice");
        assert_eq!(menu.find(text), Some(rows[0]));
        assert_eq!(menu.find(menu.element()), None);

        menu.release_all_rows();
        assert_eq!(menu.find(text), None);
        assert!(menu.rows().is_empty());
    }

    #[test]
    fn test_project_is_pure_function_of_state() {
        let (mut menu, rows) = menu_with_rows(2);
        menu.project(Visibility::Shown, Some(rows[1]), &rows);
        assert!(!menu.is_hidden_class_set());
        assert!(!menu.is_highlighted_class_set(rows[0]));
        assert!(menu.is_highlighted_class_set(rows[1]));

        menu.project(Visibility::Hidden, Some(rows[1]), &rows);
        assert!(menu.is_hidden_class_set());
        assert!(!menu.is_highlighted_class_set(rows[1]));
    }

    #[test]
    fn test_position_sets_style() {
        let mut menu = Menu::new(ClassNames::default());
        menu.set_position(12, 40);
        assert_eq!(menu.position(), Some(MenuPosition { top: 12, left: 40 }));
        assert_eq!(
            menu.document().attribute(menu.element(), "style"),
            Some("top: 12px; left: 40px")
        );
    }
}
