//! Core configuration, errors and identifiers.

pub mod config;
pub mod errors;
pub mod ids;

pub use config::{AppConfig, ChatConfig, ServerConfig, StorageConfig};
pub use errors::{AppError, AppResult};
pub use ids::{ApplicationId, FaqId, MessageId, PetId, SessionId, UserId};
