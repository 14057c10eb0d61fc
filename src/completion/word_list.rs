use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

use super::CompletionSource;
use crate::matcher::MatchResult;
use crate::store::CompletionOption;

/// Completes the query against a fixed word list, ranked by match quality.
#[derive(Debug, Clone)]
pub struct WordListSource {
    words: Vec<String>,
    prefix: String,
    limit: Option<usize>,
}

impl WordListSource {
    pub fn new<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            prefix: String::new(),
            limit: None,
        }
    }

    /// Text put in front of the word on selection, usually the trigger
    /// character.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Ranked words for `query`: closer matches first, then shorter words,
    /// then list order.
    pub fn rank(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        let mut matches: Vec<(Closeness, usize, &str)> = self
            .words
            .iter()
            .filter_map(|word| {
                let closeness = Closeness::of(&query, &word.to_lowercase())?;
                Some((closeness, word.chars().count(), word.as_str()))
            })
            .collect();

        matches.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let limit = self.limit.unwrap_or(usize::MAX);
        matches.into_iter().take(limit).map(|(_, _, word)| word).collect()
    }
}

/// How a lowercased word relates to a lowercased query. Later variants
/// rank higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Closeness {
    Scattered,
    Inside,
    Prefix,
    Exact,
}

impl Closeness {
    fn of(query: &str, word: &str) -> Option<Self> {
        if word == query {
            Some(Self::Exact)
        } else if word.starts_with(query) {
            Some(Self::Prefix)
        } else if word.contains(query) {
            Some(Self::Inside)
        } else if is_subsequence(query, word) {
            Some(Self::Scattered)
        } else {
            None
        }
    }
}

fn is_subsequence(query: &str, word: &str) -> bool {
    let mut rest = word.chars();
    query.chars().all(|wanted| rest.any(|c| c == wanted))
}

#[async_trait]
impl CompletionSource for WordListSource {
    async fn options_for(&self, matched: &MatchResult) -> Result<Vec<CompletionOption>> {
        Ok(self
            .rank(matched.query())
            .into_iter()
            .map(|word| {
                CompletionOption::value(word, word)
                    .with_payload(json!({ "text": format!("{}{}", self.prefix, word) }))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Trigger;

    fn matched(text: &str) -> MatchResult {
        Trigger::new(r"@(\w*)$").unwrap().find(text).unwrap()
    }

    #[test]
    fn test_closeness_tiers() {
        assert_eq!(Closeness::of("al", "al"), Some(Closeness::Exact));
        assert_eq!(Closeness::of("al", "alice"), Some(Closeness::Prefix));
        assert_eq!(Closeness::of("li", "alice"), Some(Closeness::Inside));
        assert_eq!(Closeness::of("ae", "alice"), Some(Closeness::Scattered));
        assert_eq!(Closeness::of("xyz", "alice"), None);
        assert_eq!(Closeness::of("", "alice"), Some(Closeness::Prefix));
        assert!(Closeness::Prefix > Closeness::Inside);
    }

    #[test]
    fn test_rank_ignores_case() {
        let source = WordListSource::new(["Alice", "bob"]);
        assert_eq!(source.rank("AL"), vec!["Alice"]);
    }

    #[test]
    fn test_rank_breaks_ties_by_length_then_order() {
        let source = WordListSource::new(["alfred", "albert", "al", "alice"]);
        assert_eq!(source.rank("al"), vec!["al", "alice", "alfred", "albert"]);
    }

    #[test]
    fn test_rank_orders_and_limits() {
        let source = WordListSource::new(["malcolm", "alice", "alfred", "bob"]).with_limit(2);
        assert_eq!(source.rank("al"), vec!["alice", "alfred"]);
        assert_eq!(source.rank("zz"), Vec::<&str>::new());
    }

    #[tokio::test]
    async fn test_options_carry_prefixed_text() {
        let source = WordListSource::new(["alice", "bob"]).with_prefix("@");
        let options = source.options_for(&matched("hi @al")).await.unwrap();

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].label, "alice");
        assert_eq!(options[0].id.as_str(), "alice");
        assert_eq!(options[0].payload["text"], "@alice");
    }

    #[tokio::test]
    async fn test_empty_query_lists_everything() {
        let source = WordListSource::new(["alice", "bob"]);
        let options = source.options_for(&matched("@")).await.unwrap();
        assert_eq!(options.len(), 2);
    }
}
