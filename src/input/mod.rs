//! Host input wiring: key presses, focus and pointer movement.

mod handler_result;

pub use handler_result::KeyHandlerResult;

use crate::autocomplete::Autocomplete;
use crate::dom::NodeId;
use crate::store::OptionRef;
use crate::surface::Surface;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// Keys whose release never starts a match: navigation, editing and
/// modifier keys.
pub fn is_ignored_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Down
            | KeyCode::Up
            | KeyCode::Esc
            | KeyCode::Enter
            | KeyCode::Tab
            | KeyCode::BackTab
            | KeyCode::CapsLock
            | KeyCode::Modifier(_)
            | KeyCode::PageUp
            | KeyCode::PageDown
            | KeyCode::End
            | KeyCode::Home
            | KeyCode::Insert
            | KeyCode::Delete
            | KeyCode::Left
            | KeyCode::Right
    )
}

impl<S: Surface> Autocomplete<S> {
    /// Menu navigation while the menu is shown.
    pub fn on_key_down(&mut self, code: KeyCode) -> KeyHandlerResult {
        if !self.is_shown() {
            return KeyHandlerResult::NotHandled;
        }

        match code {
            KeyCode::Down => {
                self.next();
            }
            KeyCode::Up => {
                self.previous();
            }
            KeyCode::Esc => {
                self.hide();
            }
            KeyCode::Enter | KeyCode::Tab => {
                if let Some(id) = self.highlighted().map(|o| o.id.clone()) {
                    self.select(OptionRef::Id(id));
                }
            }
            _ => return KeyHandlerResult::NotHandled,
        }
        KeyHandlerResult::Handled
    }

    /// Runs a match once the key's effect is visible in the surface.
    /// Returns whether a match was found.
    pub fn on_key_up(&mut self, code: KeyCode) -> bool {
        if is_ignored_key(code) {
            return false;
        }
        self.match_input()
    }

    /// Routes a crossterm key event by kind. Releases only arrive from
    /// terminals with keyboard enhancement enabled.
    pub fn on_key_event(&mut self, event: &KeyEvent) -> KeyHandlerResult {
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.on_key_down(event.code),
            KeyEventKind::Release => {
                self.on_key_up(event.code);
                KeyHandlerResult::NotHandled
            }
        }
    }

    /// The caret settles after focus, so the check is deferred to the next
    /// [`on_tick`](Self::on_tick).
    pub fn on_focus(&mut self) {
        self.focus_pending = true;
    }

    /// Runs a match deferred by `on_focus`. Returns whether one ran.
    pub fn on_tick(&mut self) -> bool {
        if !std::mem::take(&mut self.focus_pending) {
            return false;
        }
        self.match_input();
        true
    }

    /// Hides the menu when the surface loses focus and drops any match
    /// still waiting for `on_tick`.
    pub fn on_blur(&mut self) -> bool {
        self.focus_pending = false;
        self.hide()
    }

    /// Highlights the option row under the pointer, if any.
    pub fn on_pointer_move(&mut self, target: NodeId) -> bool {
        match self.find(target) {
            Some(row) => self.highlight(OptionRef::Element(row)).is_some(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CompleteEvent;
    use crate::matcher::Trigger;
    use crate::store::CompletionOption;
    use crate::surface::TextBuffer;
    use crossterm::event::{KeyModifiers, ModifierKeyCode};

    fn engine(text: &str) -> Autocomplete<TextBuffer> {
        Autocomplete::new(TextBuffer::new(text), Trigger::new(r"@(\w*)$").unwrap())
    }

    fn shown(text: &str) -> Autocomplete<TextBuffer> {
        let mut engine = engine(text);
        engine.match_input();
        engine.populate(vec![
            CompletionOption::value("a", "alice"),
            CompletionOption::value("b", "bob"),
        ]);
        engine
    }

    #[test]
    fn test_keys_pass_through_while_hidden() {
        let mut engine = engine("hi @al");
        assert_eq!(engine.on_key_down(KeyCode::Down), KeyHandlerResult::NotHandled);
        assert_eq!(engine.on_key_down(KeyCode::Enter), KeyHandlerResult::NotHandled);
    }

    #[test]
    fn test_arrow_keys_navigate() {
        let mut engine = shown("hi @al");
        assert!(engine.on_key_down(KeyCode::Down).is_handled());
        assert_eq!(engine.highlighted().map(|o| o.label.as_str()), Some("bob"));
        assert!(engine.on_key_down(KeyCode::Up).is_handled());
        assert_eq!(engine.highlighted().map(|o| o.label.as_str()), Some("alice"));
    }

    #[test]
    fn test_escape_hides() {
        let mut engine = shown("hi @al");
        assert!(engine.on_key_down(KeyCode::Esc).is_handled());
        assert!(!engine.is_shown());
    }

    #[test]
    fn test_enter_and_tab_select_highlighted() {
        let mut engine = shown("hi @al");
        assert!(engine.on_key_down(KeyCode::Tab).is_handled());
        assert_eq!(engine.surface().value(), "hi alice ");

        let mut engine = shown("hi @al");
        engine.next();
        assert!(engine.on_key_down(KeyCode::Enter).is_handled());
        assert_eq!(engine.surface().value(), "hi bob ");
    }

    #[test]
    fn test_enter_with_nothing_highlighted_is_still_swallowed() {
        let mut engine = shown("hi @al");
        engine.previous();
        assert!(engine.on_key_down(KeyCode::Enter).is_handled());
        assert_eq!(engine.surface().value(), "hi @al");
    }

    #[test]
    fn test_other_keys_are_not_handled() {
        let mut engine = shown("hi @al");
        assert_eq!(
            engine.on_key_down(KeyCode::Char('x')),
            KeyHandlerResult::NotHandled
        );
    }

    #[test]
    fn test_key_up_matches_unless_ignored() {
        let mut engine = engine("hi @al");
        assert!(engine.on_key_up(KeyCode::Char('l')));
        assert!(!engine.on_key_up(KeyCode::Left));
        assert!(!engine.on_key_up(KeyCode::Modifier(ModifierKeyCode::LeftShift)));
        assert!(engine.on_key_up(KeyCode::Backspace));
    }

    #[test]
    fn test_key_event_routes_by_kind() {
        let mut engine = shown("hi @al");
        let press = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert!(engine.on_key_event(&press).is_handled());

        let mut release = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(engine.on_key_event(&release), KeyHandlerResult::NotHandled);
    }

    #[test]
    fn test_focus_match_waits_for_tick() {
        let mut engine = engine("hi @al");
        let mut rx = engine.subscribe();
        engine.on_focus();
        assert!(engine.current_match().is_none());

        assert!(engine.on_tick());
        assert_eq!(engine.current_match().map(|m| m.query()), Some("al"));
        assert!(!engine.on_tick());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_pointer_move_highlights_row_under_pointer() {
        let mut engine = shown("hi @al");
        let mut rx = engine.subscribe();
        let rows = engine.menu().rows();
        let label = engine.menu().document().children(rows[1])[0];

        assert!(engine.on_pointer_move(label));
        assert_eq!(engine.highlighted().map(|o| o.label.as_str()), Some("bob"));
        assert!(matches!(rx.try_recv(), Ok(CompleteEvent::Highlight(_))));

        let element = engine.menu().element();
        assert!(!engine.on_pointer_move(element));
        assert_eq!(engine.highlighted().map(|o| o.label.as_str()), Some("bob"));
    }

    #[test]
    fn test_pointer_resting_on_a_row_highlights_once() {
        let mut engine = shown("hi @al");
        let mut rx = engine.subscribe();
        let row = engine.menu().rows()[1];

        assert!(engine.on_pointer_move(row));
        assert!(engine.on_pointer_move(row));
        assert!(matches!(rx.try_recv(), Ok(CompleteEvent::Highlight(_))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_blur_hides_menu() {
        let mut engine = shown("hi @al");
        let mut rx = engine.subscribe();

        assert!(engine.on_blur());
        assert!(!engine.is_shown());
        assert!(engine.current_match().is_none());
        assert_eq!(rx.try_recv(), Ok(CompleteEvent::Hide));
        assert!(!engine.on_blur());
    }

    #[test]
    fn test_blur_cancels_pending_focus_match() {
        let mut engine = engine("hi @al");
        engine.on_focus();
        assert!(!engine.on_blur());
        assert!(!engine.on_tick());
        assert!(engine.current_match().is_none());
    }
}
