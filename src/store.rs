//! Conversation state: ordered history, draft text and picker flag

use crate::message::{ChatRole, Message};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Store handle shared between the UI loop and in-flight requests
pub type SharedStore = Arc<Mutex<ConversationStore>>;

/// Change notification delivered to every listener after a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A message was pushed at `index`
    MessageAppended { index: usize },
    /// The draft text changed
    DraftChanged,
    /// The draft was committed as the user message at `index`
    DraftCommitted { index: usize },
    /// The picker flag changed
    PickerToggled { visible: bool },
}

/// Handle returned by [`ConversationStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&StoreEvent) + Send + Sync>;

/// Conversation state. Messages are append-only; nothing reorders or edits
/// an entry once pushed.
///
/// Listeners run synchronously while the store is borrowed, so they must not
/// call back into the store.
#[derive(Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
    draft: String,
    picker_visible: bool,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for ConversationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationStore")
            .field("messages", &self.messages)
            .field("draft", &self.draft)
            .field("picker_visible", &self.picker_visible)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a fresh store for sharing across tasks
    pub fn shared() -> SharedStore {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn picker_visible(&self) -> bool {
        self.picker_visible
    }

    /// Register a listener called after every mutation
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Push a message at the end of the history
    pub fn append_message(&mut self, message: Message) {
        let index = self.push(message);
        self.notify(StoreEvent::MessageAppended { index });
    }

    /// Replace the draft verbatim
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.notify(StoreEvent::DraftChanged);
    }

    /// Commit the draft as a user message.
    ///
    /// A draft that is blank after trimming is left alone and nothing is
    /// returned. Otherwise the untrimmed text is appended, the draft cleared
    /// and the picker closed.
    pub fn commit_draft(&mut self) -> Option<Message> {
        if self.draft.trim().is_empty() {
            return None;
        }

        let message = Message::new(ChatRole::User, std::mem::take(&mut self.draft));
        self.picker_visible = false;
        let index = self.push(message.clone());
        self.notify(StoreEvent::DraftCommitted { index });
        Some(message)
    }

    /// Append a picked emoji to the draft. `None` or `""` is ignored.
    pub fn append_emoji(&mut self, symbol: Option<&str>) {
        match symbol {
            Some(symbol) if !symbol.is_empty() => {
                self.draft.push_str(symbol);
                self.notify(StoreEvent::DraftChanged);
            }
            _ => {}
        }
    }

    pub fn toggle_picker(&mut self) {
        self.picker_visible = !self.picker_visible;
        self.notify(StoreEvent::PickerToggled {
            visible: self.picker_visible,
        });
    }

    pub fn close_picker(&mut self) {
        if self.picker_visible {
            self.toggle_picker();
        }
    }

    fn push(&mut self, message: Message) -> usize {
        debug!(role = %message.role, index = self.messages.len(), "appending message");
        self.messages.push(message);
        self.messages.len() - 1
    }

    fn notify(&self, event: StoreEvent) {
        for (_, listener) in &self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_store() -> (ConversationStore, Arc<Mutex<Vec<StoreEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut store = ConversationStore::new();
        let sink = events.clone();
        store.subscribe(move |event| sink.lock().push(event.clone()));
        (store, events)
    }

    #[test]
    fn append_preserves_call_order() {
        let mut store = ConversationStore::new();
        let expected = vec![
            Message::system("seed"),
            Message::user("first"),
            Message::user("first"),
            Message::system("reply"),
        ];
        for message in &expected {
            store.append_message(message.clone());
        }
        assert_eq!(store.messages(), expected.as_slice());
    }

    #[test]
    fn blank_draft_commit_is_noop() {
        let (mut store, events) = recording_store();
        store.set_draft("   ");
        events.lock().clear();

        assert_eq!(store.commit_draft(), None);
        assert!(store.messages().is_empty());
        assert_eq!(store.draft(), "   ");
        assert!(events.lock().is_empty());
    }

    #[test]
    fn commit_appends_untrimmed_draft_and_resets() {
        let mut store = ConversationStore::new();
        store.set_draft("hello");
        store.toggle_picker();

        let committed = store.commit_draft();
        assert_eq!(committed, Some(Message::user("hello")));
        assert_eq!(store.messages(), &[Message::user("hello")]);
        assert_eq!(store.draft(), "");
        assert!(!store.picker_visible());

        store.set_draft("  padded ");
        store.commit_draft();
        assert_eq!(store.messages()[1], Message::user("  padded "));
    }

    #[test]
    fn set_draft_does_not_trim() {
        let mut store = ConversationStore::new();
        store.set_draft("  spaced  ");
        assert_eq!(store.draft(), "  spaced  ");
    }

    #[test]
    fn emoji_appends_to_draft() {
        let mut store = ConversationStore::new();
        store.set_draft("hi ");
        store.append_emoji(Some("😀"));
        assert_eq!(store.draft(), "hi 😀");
    }

    #[test]
    fn missing_emoji_leaves_draft() {
        let (mut store, events) = recording_store();
        store.set_draft("hi");
        events.lock().clear();

        store.append_emoji(None);
        store.append_emoji(Some(""));
        assert_eq!(store.draft(), "hi");
        assert!(events.lock().is_empty());
    }

    #[test]
    fn listeners_see_each_mutation_once() {
        let (mut store, events) = recording_store();
        store.append_message(Message::system("seed"));
        store.set_draft("hey");
        store.toggle_picker();
        store.commit_draft();
        store.close_picker();

        assert_eq!(
            *events.lock(),
            vec![
                StoreEvent::MessageAppended { index: 0 },
                StoreEvent::DraftChanged,
                StoreEvent::PickerToggled { visible: true },
                StoreEvent::DraftCommitted { index: 1 },
            ]
        );
    }

    #[test]
    fn unsubscribed_listener_is_silent() {
        let (mut store, events) = recording_store();
        let counter = Arc::new(Mutex::new(0));
        let count = counter.clone();
        let id = store.subscribe(move |_| *count.lock() += 1);

        store.set_draft("a");
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_draft("b");

        assert_eq!(*counter.lock(), 1);
        assert_eq!(events.lock().len(), 2);
    }
}
