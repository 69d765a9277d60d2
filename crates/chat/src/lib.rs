//! Conversation state and send orchestration.
//!
//! This crate owns everything a chat session mutates:
//! - the append-only conversation log and its history window
//! - the pending-attachment list with type filtering
//! - the backend catalog the user picks from
//! - the controller driving one send at a time through the dispatcher

pub mod attachments;
pub mod catalog;
pub mod controller;
pub mod conversation;

pub use controller::ChatController;
pub use conversation::{ConversationLog, Message, Sender, HISTORY_WINDOW};
