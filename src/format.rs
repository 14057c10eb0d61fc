use crate::dom::{Document, NodeId};
use crate::store::CompletionOption;

/// Host hooks for turning options into menu rows and inserted text.
pub trait OptionFormatter {
    /// Fills a freshly created, empty menu row for `option`.
    fn render_option(&self, option: &CompletionOption, menu: &mut Document, row: NodeId) {
        menu.append_text(row, &option.label);
    }

    /// Text (or markup, on a rich-text surface) replacing the matched span
    /// when `option` is selected.
    fn format_selection(&self, option: &CompletionOption) -> String {
        option
            .payload
            .get("text")
            .and_then(|text| text.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| option.label.clone())
    }
}

/// Label-only rows; selection inserts `payload.text` or the label.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainFormatter;

impl OptionFormatter for PlainFormatter {}
