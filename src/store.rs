//! The current option set and which option is highlighted or selected.

use crate::dom::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(String);

impl OptionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OptionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for OptionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for OptionId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OptionKind {
    /// Rewrites the match with `insert` and starts a new match cycle.
    Query { insert: String },
    /// A final value; selection ends the cycle.
    Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOption {
    pub id: OptionId,
    #[serde(flatten)]
    pub kind: OptionKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    /// Menu row rendering this option, once `format_option` ran.
    #[serde(skip)]
    pub el: Option<NodeId>,
}

impl CompletionOption {
    pub fn value(id: impl Into<OptionId>, label: &str) -> Self {
        Self {
            id: id.into(),
            kind: OptionKind::Value,
            label: label.to_string(),
            payload: serde_json::Value::Null,
            el: None,
        }
    }

    pub fn query(id: impl Into<OptionId>, label: &str, insert: &str) -> Self {
        Self {
            id: id.into(),
            kind: OptionKind::Query {
                insert: insert.to_string(),
            },
            label: label.to_string(),
            payload: serde_json::Value::Null,
            el: None,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn is_query(&self) -> bool {
        matches!(self.kind, OptionKind::Query { .. })
    }
}

/// Ways a caller can point at an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionRef {
    Id(OptionId),
    /// The rendered row (or the option class ancestor found from a target).
    Element(NodeId),
    /// Position in the current set.
    Index(usize),
}

impl From<OptionId> for OptionRef {
    fn from(id: OptionId) -> Self {
        OptionRef::Id(id)
    }
}

impl From<&OptionId> for OptionRef {
    fn from(id: &OptionId) -> Self {
        OptionRef::Id(id.clone())
    }
}

impl From<&CompletionOption> for OptionRef {
    fn from(option: &CompletionOption) -> Self {
        OptionRef::Id(option.id.clone())
    }
}

impl From<NodeId> for OptionRef {
    fn from(el: NodeId) -> Self {
        OptionRef::Element(el)
    }
}

impl From<&str> for OptionRef {
    fn from(id: &str) -> Self {
        OptionRef::Id(id.into())
    }
}

#[derive(Debug, Default)]
pub struct OptionStore {
    options: IndexMap<OptionId, CompletionOption>,
    highlighted: Option<OptionId>,
    selected: Option<OptionId>,
}

impl OptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the option set. Returns the rows of options that are gone,
    /// for the caller to release. A repeated id keeps its first position and
    /// its latest value.
    pub fn set_options(&mut self, list: Vec<CompletionOption>) -> Vec<NodeId> {
        let previous = std::mem::take(&mut self.options);
        for option in list {
            self.options.insert(option.id.clone(), option);
        }

        if let Some(id) = &self.highlighted
            && !self.options.contains_key(id)
        {
            self.highlighted = None;
        }
        if let Some(id) = &self.selected
            && !self.options.contains_key(id)
        {
            self.selected = None;
        }

        let kept: Vec<NodeId> = self.options.values().filter_map(|o| o.el).collect();
        previous
            .into_values()
            .filter_map(|o| o.el)
            .filter(|el| !kept.contains(el))
            .collect()
    }

    /// Empties the set and forgets highlight and selection. Returns the rows
    /// that backed the removed options.
    pub fn clear(&mut self) -> Vec<NodeId> {
        self.highlighted = None;
        self.selected = None;
        std::mem::take(&mut self.options)
            .into_values()
            .filter_map(|o| o.el)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompletionOption> {
        self.options.values()
    }

    pub fn get(&self, id: &OptionId) -> Option<&CompletionOption> {
        self.options.get(id)
    }

    pub fn get_index(&self, index: usize) -> Option<&CompletionOption> {
        self.options.get_index(index).map(|(_, o)| o)
    }

    pub fn index_of(&self, id: &OptionId) -> Option<usize> {
        self.options.get_index_of(id)
    }

    /// Resolves a reference against the current set.
    pub fn resolve(&self, reference: &OptionRef) -> Option<OptionId> {
        match reference {
            OptionRef::Id(id) => self.options.contains_key(id).then(|| id.clone()),
            OptionRef::Element(el) => self
                .options
                .values()
                .find(|o| o.el == Some(*el))
                .map(|o| o.id.clone()),
            OptionRef::Index(index) => self.options.get_index(*index).map(|(id, _)| id.clone()),
        }
    }

    /// Binds a rendered row to an option. Returns the row it replaces, if any.
    pub fn assign_element(&mut self, id: &OptionId, el: NodeId) -> Option<Option<NodeId>> {
        let option = self.options.get_mut(id)?;
        Some(option.el.replace(el))
    }

    pub fn highlighted(&self) -> Option<&CompletionOption> {
        self.highlighted.as_ref().and_then(|id| self.options.get(id))
    }

    pub fn set_highlighted(&mut self, id: Option<OptionId>) {
        self.highlighted = id.filter(|id| self.options.contains_key(id));
    }

    pub fn selected(&self) -> Option<&CompletionOption> {
        self.selected.as_ref().and_then(|id| self.options.get(id))
    }

    pub fn set_selected(&mut self, id: Option<OptionId>) {
        self.selected = id.filter(|id| self.options.contains_key(id));
    }
}
