/// Whether the host should swallow a key the engine looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyHandlerResult {
    NotHandled,
    Handled,
}

impl KeyHandlerResult {
    pub fn is_handled(self) -> bool {
        self == KeyHandlerResult::Handled
    }
}
