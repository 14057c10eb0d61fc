//! Arena-backed document tree.
//!
//! Used for two things: the rich-text editing surface, and the menu the
//! options are rendered into. Nodes are never freed; "releasing" a node
//! detaches it from its parent so it is no longer reachable from the root.

pub mod markup;

use markup::Fragment;

pub type NodeIndex = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub NodeIndex);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeEntry {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// A point in the document: a node and an offset into it.
///
/// For text nodes the offset is a byte offset into the text. For elements
/// it is a child index, the way DOM ranges address element boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomPosition {
    pub node: NodeId,
    pub offset: usize,
}

impl DomPosition {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomSelection {
    pub anchor: DomPosition,
    pub focus: DomPosition,
}

impl DomSelection {
    pub fn collapsed(position: DomPosition) -> Self {
        Self {
            anchor: position,
            focus: position,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "wbr"];

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeEntry>,
    root: NodeId,
    selection: Option<DomSelection>,
}

impl Document {
    pub fn new(root_name: &str) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            selection: None,
        };
        doc.root = doc.create_element(root_name);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn entry(&self, node: NodeId) -> Option<&NodeEntry> {
        self.nodes.get(node.0 as usize)
    }

    fn entry_mut(&mut self, node: NodeId) -> Option<&mut NodeEntry> {
        self.nodes.get_mut(node.0 as usize)
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as NodeIndex);
        self.nodes.push(NodeEntry {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeData::Element {
            name: name.to_ascii_lowercase(),
            attributes: Vec::new(),
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.entry(node).is_some()
    }

    pub fn data(&self, node: NodeId) -> Option<&NodeData> {
        self.entry(node).map(|e| &e.data)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.entry(node).and_then(|e| e.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.entry(node).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// True when the node is reachable from the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.data(node), Some(NodeData::Text(_)))
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.data(node), Some(NodeData::Element { .. }))
    }

    pub fn name(&self, node: NodeId) -> Option<&str> {
        match self.data(node)? {
            NodeData::Element { name, .. } => Some(name),
            NodeData::Text(_) => None,
        }
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.data(node)? {
            NodeData::Text(text) => Some(text),
            NodeData::Element { .. } => None,
        }
    }

    pub fn set_text(&mut self, node: NodeId, value: &str) -> bool {
        match self.entry_mut(node).map(|e| &mut e.data) {
            Some(NodeData::Text(text)) => {
                *text = value.to_string();
                true
            }
            _ => false,
        }
    }

    /// Concatenated text of the node and all its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match self.data(node) {
            Some(NodeData::Text(text)) => out.push_str(text),
            Some(NodeData::Element { .. }) => {
                for &child in self.children(node) {
                    self.collect_text(child, out);
                }
            }
            None => {}
        }
    }

    /// Text of the direct text children only, skipping formatting elements.
    pub fn own_text(&self, node: NodeId) -> String {
        self.children(node)
            .iter()
            .filter_map(|&child| self.text(child))
            .collect()
    }

    pub fn attribute(&self, node: NodeId, key: &str) -> Option<&str> {
        match self.data(node)? {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            NodeData::Text(_) => None,
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, key: &str, value: &str) {
        if let Some(NodeData::Element { attributes, .. }) = self.entry_mut(node).map(|e| &mut e.data)
        {
            match attributes.iter_mut().find(|(k, _)| k == key) {
                Some((_, v)) => *v = value.to_string(),
                None => attributes.push((key.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, key: &str) {
        if let Some(NodeData::Element { attributes, .. }) = self.entry_mut(node).map(|e| &mut e.data)
        {
            attributes.retain(|(k, _)| k != key);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Adds or removes `class` so that its presence equals `on`.
    pub fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) {
        if !self.is_element(node) || self.has_class(node, class) == on {
            return;
        }
        let mut classes: Vec<String> = self
            .attribute(node, "class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        if on {
            classes.push(class.to_string());
        } else {
            classes.retain(|c| c != class);
        }
        if classes.is_empty() {
            self.remove_attribute(node, "class");
        } else {
            self.set_attribute(node, "class", &classes.join(" "));
        }
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        self.toggle_class(node, class, true);
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.toggle_class(node, class, false);
    }

    pub fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|&c| c == node)
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let index = self.index_in_parent(node)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let index = self.index_in_parent(node)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// Nearest ancestor-or-self satisfying `predicate`.
    pub fn closest(&self, node: NodeId, predicate: impl Fn(&Self, NodeId) -> bool) -> Option<NodeId> {
        let mut current = self.contains(node).then_some(node);
        while let Some(id) = current {
            if predicate(self, id) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(entry) = self.entry_mut(parent) {
            entry.children.retain(|&c| c != node);
        }
        if let Some(entry) = self.entry_mut(node) {
            entry.parent = None;
        }
    }

    /// Inserts `child` into `parent` before `reference`, or at the end when
    /// `reference` is `None` or not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if !self.is_element(parent) || !self.contains(child) || child == parent {
            return;
        }
        self.detach(child);
        let index = reference
            .and_then(|r| self.children(parent).iter().position(|&c| c == r))
            .unwrap_or_else(|| self.children(parent).len());
        if let Some(entry) = self.entry_mut(parent) {
            entry.children.insert(index, child);
        }
        if let Some(entry) = self.entry_mut(child) {
            entry.parent = Some(parent);
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.create_text(text);
        self.append_child(parent, node);
        node
    }

    pub fn append_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        let node = self.create_element(name);
        self.append_child(parent, node);
        node
    }

    /// Replaces `node` with `replacements`, in order, at the same position.
    /// Siblings on both sides are left untouched.
    pub fn replace_with(&mut self, node: NodeId, replacements: &[NodeId]) -> bool {
        let Some(parent) = self.parent(node) else {
            return false;
        };
        let next = self.next_sibling(node);
        self.detach(node);
        for &replacement in replacements {
            self.insert_before(parent, replacement, next);
        }
        true
    }

    /// Materializes parsed markup as detached nodes and returns the top-level ones.
    pub fn create_fragment(&mut self, fragment: &[Fragment]) -> Vec<NodeId> {
        fragment
            .iter()
            .map(|node| self.create_fragment_node(node))
            .collect()
    }

    fn create_fragment_node(&mut self, node: &Fragment) -> NodeId {
        match node {
            Fragment::Text(text) => self.create_text(text),
            Fragment::Element {
                name,
                attributes,
                children,
            } => {
                let element = self.create_element(name);
                for (key, value) in attributes {
                    self.set_attribute(element, key, value);
                }
                for child in children {
                    let child = self.create_fragment_node(child);
                    self.append_child(element, child);
                }
                element
            }
        }
    }

    pub fn selection(&self) -> Option<DomSelection> {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Option<DomSelection>) {
        self.selection = selection;
    }

    pub fn collapse(&mut self, node: NodeId, offset: usize) {
        self.selection = Some(DomSelection::collapsed(DomPosition::new(node, offset)));
    }

    /// Serializes the children of `node` back to markup.
    pub fn inner_markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            self.write_markup(child, &mut out);
        }
        out
    }

    fn write_markup(&self, node: NodeId, out: &mut String) {
        match self.data(node) {
            Some(NodeData::Text(text)) => out.push_str(&markup::escape_text(text)),
            Some(NodeData::Element { name, attributes }) => {
                out.push('<');
                out.push_str(name);
                for (key, value) in attributes {
                    out.push_str(&format!(" {}=\"{}\"", key, markup::escape_attribute(value)));
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    return;
                }
                for &child in self.children(node) {
                    self.write_markup(child, out);
                }
                out.push_str(&format!("</{}>", name));
            }
            None => {}
        }
    }
}

pub(crate) fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}
