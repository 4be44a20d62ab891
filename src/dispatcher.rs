//! Message dispatch between the conversation store and the completion service

use crate::config::ModelConfig;
use crate::llm::CompletionEndpoint;
use crate::message::{ChatRole, Message};
use crate::store::SharedStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Issues completion calls and merges replies back into the store.
///
/// Calls are best-effort: a failure is logged and dropped, nothing is retried
/// and whatever the store already holds stays there.
pub struct Dispatcher<E> {
    store: SharedStore,
    endpoint: Arc<E>,
    models: ModelConfig,
    bootstrap_prompt: Arc<str>,
    in_flight: Arc<AtomicUsize>,
}

/// Counts a request as in flight until dropped
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn start(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<E> Clone for Dispatcher<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            endpoint: self.endpoint.clone(),
            models: self.models.clone(),
            bootstrap_prompt: self.bootstrap_prompt.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<E: CompletionEndpoint> Dispatcher<E> {
    pub fn new(
        store: SharedStore,
        endpoint: E,
        models: ModelConfig,
        bootstrap_prompt: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            store,
            endpoint: Arc::new(endpoint),
            models,
            bootstrap_prompt: bootstrap_prompt.into(),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Number of completion calls that have not finished yet
    pub fn pending(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Seed the session with the world-building prompt on the primary model
    pub async fn bootstrap(&self) {
        let _in_flight = InFlight::start(&self.in_flight);
        self.run_bootstrap().await;
    }

    /// Submit `messages` on the fast model
    pub async fn send(&self, messages: Vec<Message>) {
        let _in_flight = InFlight::start(&self.in_flight);
        self.run_send(messages).await;
    }

    /// Run [`Dispatcher::bootstrap`] in the background
    pub fn spawn_bootstrap(&self) -> JoinHandle<()> {
        let in_flight = InFlight::start(&self.in_flight);
        let dispatcher = self.clone();
        tokio::spawn(async move {
            let _in_flight = in_flight;
            dispatcher.run_bootstrap().await
        })
    }

    /// Commit the draft and send it as a single-turn request.
    ///
    /// Returns the background task, or `None` when the draft was blank. The
    /// request carries only the committed message, never earlier history.
    pub fn submit_draft(&self) -> Option<JoinHandle<()>> {
        let committed = self.store.lock().commit_draft()?;
        // counted before the spawn so `pending` reflects it immediately
        let in_flight = InFlight::start(&self.in_flight);
        let dispatcher = self.clone();
        Some(tokio::spawn(async move {
            let _in_flight = in_flight;
            dispatcher.run_send(vec![committed]).await
        }))
    }

    async fn run_bootstrap(&self) {
        self.dispatch("bootstrap", &self.models.primary, self.bootstrap_seed())
            .await
    }

    async fn run_send(&self, messages: Vec<Message>) {
        self.dispatch("send", &self.models.fast, messages).await
    }

    fn bootstrap_seed(&self) -> Vec<Message> {
        vec![Message::system(&*self.bootstrap_prompt)]
    }

    async fn dispatch(&self, call: &'static str, model: &str, messages: Vec<Message>) {
        match self.endpoint.complete(model, &messages).await {
            Ok(replies) => {
                info!(call, model, replies = replies.len(), "completion succeeded");
                let mut store = self.store.lock();
                for content in replies {
                    store.append_message(Message {
                        role: ChatRole::System,
                        content: Some(content),
                    });
                }
            }
            Err(err) => {
                error!(call, model, error = %err, "completion failed");
            }
        }
    }
}
