//! Chat widget conversations backed by the FAQ matcher.

pub mod message;
pub mod registry;
pub mod session;

pub use message::{ChatMessage, Sender};
pub use registry::SessionRegistry;
pub use session::{ChatSession, SUGGESTED_QUESTIONS, SessionSnapshot, WELCOME_MESSAGE};
