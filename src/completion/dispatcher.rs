use std::sync::Arc;
use tokio::sync::mpsc;

use super::CompletionSource;
use crate::console::console;
use crate::query::{QueryHandler, QueryRequest, QueryResponse};

/// Answers every query on a tokio task and delivers the response over a
/// channel for the host to pass to `Autocomplete::resolve`.
pub struct SourceDispatcher {
    source: Arc<dyn CompletionSource>,
    tx: mpsc::UnboundedSender<QueryResponse>,
}

impl SourceDispatcher {
    pub fn new(
        source: Arc<dyn CompletionSource>,
    ) -> (Self, mpsc::UnboundedReceiver<QueryResponse>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { source, tx }, rx)
    }
}

impl QueryHandler for SourceDispatcher {
    fn query(&mut self, request: QueryRequest) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            console().error("Completion query issued outside a tokio runtime");
            return;
        };

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        handle.spawn(async move {
            match source.options_for(&request.matched).await {
                Ok(options) => {
                    console().debug(&format!(
                        "source answered generation {} with {} options",
                        request.generation,
                        options.len()
                    ));
                    // receiver gone means the host shut down
                    let _ = tx.send(request.respond(options));
                }
                Err(e) => {
                    console().warning(&format!("Completion source failed: {:#}", e));
                }
            }
        });
    }
}
