//! The autocomplete controller.
//!
//! [`Autocomplete`] owns a surface, the trigger, the option store and the
//! menu, and drives the cycle: `match_input` decides whether the cursor sits
//! after a trigger and asks the host for options; the host answers with
//! `set_options`/`resolve`/`populate`; `show`/`hide` gate the menu;
//! `highlight`/`next`/`previous` move through it; `select` rewrites the
//! surface.
//!
//! Nothing here fails loudly. Stale references, lost anchors and ambiguous
//! cursors all degrade to "no suggestion shown", reported through return
//! values and debug logging.

use crate::config::{AutocompleteConfig, ConfigResult};
use crate::console::console;
use crate::dom::NodeId;
use crate::events::{CompleteEvent, EventBus};
use crate::format::{OptionFormatter, PlainFormatter};
use crate::matcher::{Evaluation, MatchResult, MatchState, Trigger, evaluate};
use crate::menu::{ClassNames, Menu, Visibility};
use crate::query::{NoopQuery, QueryHandler, QueryRequest, QueryResponse};
use crate::store::{CompletionOption, OptionId, OptionKind, OptionRef, OptionStore};
use crate::surface::{RewriteStep, Surface};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Next,
    Previous,
}

pub struct Autocomplete<S: Surface> {
    surface: S,
    trigger: Trigger,
    store: OptionStore,
    menu: Menu,
    visibility: Visibility,
    state: MatchState<S::Anchor>,
    query: Box<dyn QueryHandler>,
    formatter: Box<dyn OptionFormatter>,
    events: EventBus,
    generation: u64,
    pub(crate) focus_pending: bool,
}

impl<S: Surface> Autocomplete<S> {
    pub fn new(surface: S, trigger: Trigger) -> Self {
        Self::with_classes(surface, trigger, ClassNames::default())
    }

    pub fn with_classes(surface: S, trigger: Trigger, classes: ClassNames) -> Self {
        Self {
            surface,
            trigger,
            store: OptionStore::new(),
            menu: Menu::new(classes),
            visibility: Visibility::Hidden,
            state: MatchState::Idle,
            query: Box::new(NoopQuery),
            formatter: Box::new(PlainFormatter),
            events: EventBus::new(),
            generation: 0,
            focus_pending: false,
        }
    }

    pub fn from_config(surface: S, config: &AutocompleteConfig) -> ConfigResult<Self> {
        Ok(Self::with_classes(
            surface,
            config.trigger()?,
            config.classes.clone(),
        ))
    }

    pub fn with_query(mut self, handler: impl QueryHandler + 'static) -> Self {
        self.query = Box::new(handler);
        self
    }

    pub fn with_formatter(mut self, formatter: impl OptionFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut Menu {
        &mut self.menu
    }

    pub fn options(&self) -> impl Iterator<Item = &CompletionOption> {
        self.store.iter()
    }

    pub fn option(&self, id: &OptionId) -> Option<&CompletionOption> {
        self.store.get(id)
    }

    pub fn highlighted(&self) -> Option<&CompletionOption> {
        self.store.highlighted()
    }

    pub fn selected(&self) -> Option<&CompletionOption> {
        self.store.selected()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_shown(&self) -> bool {
        self.visibility.is_shown()
    }

    pub fn match_state(&self) -> &MatchState<S::Anchor> {
        &self.state
    }

    pub fn current_match(&self) -> Option<&MatchResult> {
        self.state.result()
    }

    /// Generation of the most recent query request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<CompleteEvent> {
        self.events.subscribe()
    }

    /// Re-evaluates the text before the cursor. On a match the host query
    /// callback is invoked and `true` returned; otherwise the menu hides.
    pub fn match_input(&mut self) -> bool {
        match evaluate(&self.surface, &self.trigger) {
            Evaluation::Idle(reason) => {
                console().debug(&format!(
                    "{} surface idle: {}",
                    self.surface.kind(),
                    reason
                ));
                self.state = MatchState::Idle;
                self.hide();
                false
            }
            Evaluation::Matched(active) => {
                self.generation += 1;
                let request = QueryRequest {
                    generation: self.generation,
                    matched: active.result.clone(),
                };
                console().debug(&format!(
                    "matched '{}' (query '{}'), generation {}",
                    active.result.full,
                    active.result.query(),
                    self.generation
                ));
                self.state = MatchState::Matched(active);
                self.query.query(request);
                true
            }
        }
    }

    /// Replaces the option set without showing the menu. Any response is
    /// accepted, including one for an older query.
    pub fn set_options(&mut self, options: Vec<CompletionOption>) {
        let released = self.store.set_options(options);
        self.menu.release(&released);
        if self.is_shown() && self.store.highlighted().is_none() {
            self.highlight(OptionRef::Index(0));
        }
        self.project();
    }

    /// Renders every option that has no row yet through the formatter.
    pub fn render_options(&mut self) {
        let pending: Vec<CompletionOption> =
            self.store.iter().filter(|o| o.el.is_none()).cloned().collect();
        for option in pending {
            let row = self.menu.document_mut().create_element("div");
            self.formatter
                .render_option(&option, self.menu.document_mut(), row);
            self.format_option(&option.id, row);
        }
    }

    /// Sets, renders and shows `options`; an empty list hides the menu.
    pub fn populate(&mut self, options: Vec<CompletionOption>) {
        self.set_options(options);
        self.render_options();
        if self.store.is_empty() {
            self.hide();
        } else {
            self.show();
        }
    }

    /// Populates from a query response unless a newer query was issued in
    /// the meantime or the match is gone. Returns whether it was applied.
    pub fn resolve(&mut self, response: QueryResponse) -> bool {
        if response.generation < self.generation {
            console().debug(&format!(
                "dropping stale response for generation {} (latest {})",
                response.generation, self.generation
            ));
            return false;
        }
        if !self.state.is_matched() {
            console().debug("dropping response, no active match");
            return false;
        }
        self.populate(response.options);
        true
    }

    /// Binds `row` to the option `id`: marks it with the option class and
    /// id attribute and appends it to the menu if it has no parent.
    pub fn format_option(&mut self, id: &OptionId, row: NodeId) -> Option<&CompletionOption> {
        let replaced = self.store.assign_element(id, row)?;
        if let Some(old) = replaced
            && old != row
        {
            self.menu.release(&[old]);
        }
        self.menu.attach_row(id, row);
        self.project();
        self.store.get(id)
    }

    pub fn format_selection(&self, option: &CompletionOption) -> String {
        self.formatter.format_selection(option)
    }

    pub fn position(&mut self, top: i32, left: i32) -> &mut Self {
        self.menu.set_position(top, left);
        self
    }

    /// The option row under a pointer target.
    pub fn find(&self, target: NodeId) -> Option<NodeId> {
        self.menu.find(target)
    }

    /// Empties the option set and releases its rows. Visibility is untouched.
    pub fn clear(&mut self) {
        let released = self.store.clear();
        self.menu.release(&released);
        self.menu.release_all_rows();
        self.project();
    }

    pub fn show(&mut self) -> bool {
        if self.is_shown() {
            return false;
        }
        if self.store.highlighted().is_none() {
            self.highlight(OptionRef::Index(0));
        }
        self.visibility = Visibility::Shown;
        self.project();
        self.events.emit(CompleteEvent::Show);
        true
    }

    pub fn hide(&mut self) -> bool {
        if !self.is_shown() {
            return false;
        }
        self.visibility = Visibility::Hidden;
        self.store.set_highlighted(None);
        self.project();
        self.clear();
        self.state = MatchState::Idle;
        self.events.emit(CompleteEvent::Hide);
        true
    }

    /// Highlights the referenced option. Unknown references change nothing
    /// and return `None`; the current highlight is returned without an event.
    pub fn highlight(&mut self, reference: impl Into<OptionRef>) -> Option<CompletionOption> {
        let id = self.store.resolve(&reference.into())?;
        let option = self.store.get(&id)?.clone();
        if self.store.highlighted().is_some_and(|current| current.id == id) {
            return Some(option);
        }
        self.store.set_highlighted(Some(id));
        self.project();
        self.events.emit(CompleteEvent::Highlight(option.clone()));
        Some(option)
    }

    pub fn next(&mut self) -> Option<CompletionOption> {
        self.step(Direction::Next)
    }

    pub fn previous(&mut self) -> Option<CompletionOption> {
        self.step(Direction::Previous)
    }

    // Moving past either end clears the highlight instead of wrapping.
    fn step(&mut self, direction: Direction) -> Option<CompletionOption> {
        let current = self.store.highlighted()?.clone();

        let target = match current.el {
            Some(row) => {
                let sibling = match direction {
                    Direction::Next => self.menu.next_row(row),
                    Direction::Previous => self.menu.previous_row(row),
                };
                sibling.and_then(|row| self.store.resolve(&OptionRef::Element(row)))
            }
            None => self.store.index_of(&current.id).and_then(|index| {
                let index = match direction {
                    Direction::Next => index.checked_add(1),
                    Direction::Previous => index.checked_sub(1),
                }?;
                self.store.resolve(&OptionRef::Index(index))
            }),
        };

        match target {
            Some(id) => self.highlight(OptionRef::Id(id)),
            None => {
                self.store.set_highlighted(None);
                self.project();
                None
            }
        }
    }

    /// Commits the referenced option into the surface.
    ///
    /// A query option replaces the match with its `insert` text and starts a
    /// new match cycle; a value option replaces it with the formatted
    /// selection. Either way `Change` fires and the menu hides. Nothing is
    /// mutated when the reference is stale or the surface refuses the
    /// rewrite.
    pub fn select(&mut self, reference: impl Into<OptionRef>) -> Option<CompletionOption> {
        let option = self.highlight(reference)?;
        self.store.set_selected(Some(option.id.clone()));

        let anchor = match &self.state {
            MatchState::Matched(active) => active.anchor.clone(),
            MatchState::Idle => {
                console().debug(&format!("select '{}' without an active match", option.id));
                self.dismiss();
                return None;
            }
        };

        let (replacement, step) = match &option.kind {
            OptionKind::Query { insert } => (insert.clone(), RewriteStep::Continue),
            OptionKind::Value => (self.format_selection(&option), RewriteStep::Commit),
        };

        if let Err(err) = self
            .surface
            .rewrite(&anchor, &self.trigger, &replacement, step)
        {
            console().debug(&format!("select '{}' aborted: {}", option.id, err));
            self.dismiss();
            return None;
        }

        self.events.emit(CompleteEvent::Change(option.clone()));
        self.state = MatchState::Idle;
        self.dismiss();
        if step == RewriteStep::Continue {
            self.match_input();
        }
        Some(option)
    }

    // Options set while hidden are not dropped by `hide`.
    fn dismiss(&mut self) {
        if !self.hide() {
            self.clear();
        }
    }

    fn project(&mut self) {
        let highlighted = self.store.highlighted().and_then(|o| o.el);
        let rows: Vec<NodeId> = self.store.iter().filter_map(|o| o.el).collect();
        self.menu.project(self.visibility, highlighted, &rows);
    }
}

#[cfg(test)]
#[path = "autocomplete_tests.rs"]
mod tests;
