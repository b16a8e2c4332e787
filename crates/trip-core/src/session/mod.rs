//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`)
//! - `message`: Conversation message types (`MessageRole`, `ConversationMessage`)
//! - `store`: In-memory session ownership and per-session locking (`SessionStore`)
//! - `lifecycle`: Injectable session expiry policy (`LifecyclePolicy`)

mod lifecycle;
mod message;
mod model;
mod store;

// Re-export public API
pub use lifecycle::LifecyclePolicy;
pub use message::{ConversationMessage, MessageRole};
pub use model::Session;
pub use store::SessionStore;
