//! Backend clients for the chat relay.
//!
//! Supports:
//! - a completion-style endpoint (OpenAI-compatible chat completions)
//! - a workflow-automation webhook that answers with free-form JSON
//!
//! `dispatch` routes between them and `normalize` flattens the webhook's
//! response shapes into one reply representation.

pub mod completion;
pub mod dispatch;
pub mod normalize;
pub mod workflow;

pub use dispatch::{DispatchError, Dispatcher, HttpDispatcher, OutgoingMessage};
pub use normalize::NormalizedReply;
