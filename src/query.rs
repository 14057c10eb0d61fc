//! The hand-off from a match to the host that produces options.

use crate::matcher::MatchResult;
use crate::store::CompletionOption;

/// Issued once per successful match. `generation` increases with every
/// request so late answers can be recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub generation: u64,
    pub matched: MatchResult,
}

impl QueryRequest {
    pub fn respond(&self, options: Vec<CompletionOption>) -> QueryResponse {
        QueryResponse {
            generation: self.generation,
            options,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub generation: u64,
    pub options: Vec<CompletionOption>,
}

/// Host callback invoked on every match. It must not block; options are
/// delivered later through `set_options` or `resolve`.
pub trait QueryHandler {
    fn query(&mut self, request: QueryRequest);
}

impl<F> QueryHandler for F
where
    F: FnMut(QueryRequest),
{
    fn query(&mut self, request: QueryRequest) {
        self(request)
    }
}

/// Ignores every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopQuery;

impl QueryHandler for NoopQuery {
    fn query(&mut self, _request: QueryRequest) {}
}
