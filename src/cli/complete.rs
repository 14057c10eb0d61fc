use crate::autocomplete::Autocomplete;
use crate::cli::CompleteArgs;
use crate::completion::{SourceDispatcher, WordListSource};
use crate::config::AutocompleteConfig;
use crate::console::console;
use crate::query::QueryResponse;
use crate::surface::{RichText, Surface, TextBuffer};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// What one `complete` run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    NoMatch,
    NoOptions,
    Selected { label: String, text: String },
}

trait Rendered {
    fn rendered(&self) -> String;
}

impl Rendered for TextBuffer {
    fn rendered(&self) -> String {
        self.value().to_string()
    }
}

impl Rendered for RichText {
    fn rendered(&self) -> String {
        self.markup()
    }
}

pub async fn handle_complete(
    args: CompleteArgs,
    config: &AutocompleteConfig,
) -> Result<CompletionOutcome> {
    let source = WordListSource::new(args.words.clone()).with_prefix(&args.prefix);
    let (dispatcher, rx) = SourceDispatcher::new(Arc::new(source));

    if args.rich {
        let surface = RichText::from_markup(&args.text);
        let engine = Autocomplete::from_config(surface, config)
            .context("Invalid trigger in configuration")?
            .with_query(dispatcher);
        run_cycle(engine, rx, &args).await
    } else {
        let mut surface = TextBuffer::new(&args.text);
        if let Some(cursor) = args.cursor {
            surface.set_cursor(cursor);
        }
        let engine = Autocomplete::from_config(surface, config)
            .context("Invalid trigger in configuration")?
            .with_query(dispatcher);
        run_cycle(engine, rx, &args).await
    }
}

async fn run_cycle<S>(
    mut engine: Autocomplete<S>,
    mut rx: mpsc::UnboundedReceiver<QueryResponse>,
    args: &CompleteArgs,
) -> Result<CompletionOutcome>
where
    S: Surface + Rendered,
{
    if !engine.match_input() {
        console().info("Nothing to complete at the cursor");
        return Ok(CompletionOutcome::NoMatch);
    }
    if let Some(matched) = engine.current_match() {
        console().verbose(&format!("Query: '{}'", matched.query()));
    }

    let response = tokio::time::timeout(Duration::from_millis(args.timeout_ms), rx.recv())
        .await
        .context("Timed out waiting for completions")?
        .context("Completion source stopped before answering")?;

    if !engine.resolve(response) || !engine.is_shown() {
        console().info("No matching words");
        return Ok(CompletionOutcome::NoOptions);
    }

    for _ in 0..args.pick {
        if engine.next().is_none() {
            break;
        }
    }

    let highlighted = engine.highlighted().map(|o| o.id.clone());
    for option in engine.options() {
        console().menu_row(&option.label, highlighted.as_ref() == Some(&option.id));
    }
    console().newline();

    let Some(id) = highlighted else {
        console().info("Moved past the last option, nothing selected");
        return Ok(CompletionOutcome::NoOptions);
    };
    let option = engine
        .select(id)
        .context("The surface refused the completion")?;

    let text = engine.surface().rendered();
    console().success(&format!("Selected {}", option.label));
    console().plain(&text);
    Ok(CompletionOutcome::Selected {
        label: option.label,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(text: &str, words: &[&str]) -> CompleteArgs {
        CompleteArgs {
            text: text.to_string(),
            cursor: None,
            words: words.iter().map(|w| w.to_string()).collect(),
            pick: 0,
            rich: false,
            prefix: "@".to_string(),
            timeout_ms: 1000,
        }
    }

    #[tokio::test]
    async fn test_complete_selects_best_word() {
        let outcome = handle_complete(args("hi @al", &["bob", "alice"]), &AutocompleteConfig::default())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            CompletionOutcome::Selected {
                label: "alice".to_string(),
                text: "hi @alice ".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_complete_pick_moves_down() {
        let mut args = args("@al", &["alice", "alfred"]);
        args.pick = 1;
        let outcome = handle_complete(args, &AutocompleteConfig::default())
            .await
            .unwrap();
        assert!(matches!(outcome, CompletionOutcome::Selected { label, .. } if label == "alfred"));
    }

    #[tokio::test]
    async fn test_complete_respects_cursor() {
        let mut args = args("@al and more", &["alice"]);
        args.cursor = Some(3);
        let outcome = handle_complete(args, &AutocompleteConfig::default())
            .await
            .unwrap();
        assert!(
            matches!(outcome, CompletionOutcome::Selected { text, .. } if text == "@alice  and more")
        );
    }

    #[tokio::test]
    async fn test_complete_rich_text() {
        let mut args = args("<b>hey</b> @bo", &["bob"]);
        args.rich = true;
        let outcome = handle_complete(args, &AutocompleteConfig::default())
            .await
            .unwrap();
        assert!(
            matches!(outcome, CompletionOutcome::Selected { text, .. } if text == "<b>hey</b> @bob&nbsp;")
        );
    }

    #[tokio::test]
    async fn test_complete_without_trigger_or_words() {
        let outcome = handle_complete(args("plain", &["alice"]), &AutocompleteConfig::default())
            .await
            .unwrap();
        assert_eq!(outcome, CompletionOutcome::NoMatch);

        let outcome = handle_complete(args("@zz", &["alice"]), &AutocompleteConfig::default())
            .await
            .unwrap();
        assert_eq!(outcome, CompletionOutcome::NoOptions);
    }
}
