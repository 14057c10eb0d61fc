//! Async option sources and the dispatcher that feeds their answers back
//! to the host event loop.

mod dispatcher;
mod word_list;

pub use dispatcher::SourceDispatcher;
pub use word_list::WordListSource;

use crate::matcher::MatchResult;
use crate::store::CompletionOption;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CompletionSource: Send + Sync {
    /// Options for the match, best first.
    async fn options_for(&self, matched: &MatchResult) -> Result<Vec<CompletionOption>>;
}
