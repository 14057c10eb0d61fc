use crate::store::CompletionOption;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum CompleteEvent {
    Show,
    Hide,
    Highlight(CompletionOption),
    Change(CompletionOption),
}

/// Fan-out of [`CompleteEvent`]s to every live subscriber.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<mpsc::UnboundedSender<CompleteEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<CompleteEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Sends to all subscribers, dropping the ones whose receiver is gone.
    pub fn emit(&mut self, event: CompleteEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
