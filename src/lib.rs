//! Terminal chat client for an LLM world-building assistant.
//!
//! The [`store`] holds the conversation, the [`dispatcher`] sends messages to
//! a [`llm::CompletionEndpoint`] and merges replies back, and [`app`] drives
//! both from a ratatui front end.

pub mod app;
pub mod config;
pub mod dispatcher;
pub mod emoji;
pub mod events;
pub mod llm;
pub mod message;
pub mod prompts;
pub mod store;
pub mod tui;
pub mod ui;

pub use config::Config;
pub use dispatcher::Dispatcher;
pub use llm::{CompletionEndpoint, CompletionError, Credentials, OpenAiClient};
pub use message::{ChatRole, Message, MessageContent, content_to_string};
pub use store::{ConversationStore, SharedStore, StoreEvent};
