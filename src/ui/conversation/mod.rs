//! Conversation UI components for chat interface

pub mod composer;
pub mod history;
pub mod manager;
pub mod picker;

pub use composer::{ComposerResult, ComposerView, ConversationComposer};
pub use history::ConversationHistory;
pub use manager::{ConversationAction, ConversationManager};
pub use picker::EmojiPickerView;
