//! Event and notification schemas for the ClassConnect message broker
//!
//! Every message published to the `stats` and `notifications` exchanges is a
//! JSON-encoded payload tagged by a string discriminator carried in the
//! message headers. Both sets of variants are closed tagged unions: adding a
//! variant means adding it to the enum, and the compiler enforces that every
//! dispatch site handles it.
//!
//! Decoding fails closed: an unknown discriminator is an error, and payloads
//! with missing or unexpected fields are rejected rather than silently
//! truncated.

pub mod events;
pub mod formats;
pub mod notifications;
mod templates;

pub use events::{AccountStatus, DomainEvent};
pub use formats::{Email, PushNotification};
pub use notifications::Notification;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unknown type: {0}")]
    UnknownType(String),
    #[error("error encoding {0}: {1}")]
    Encode(String, #[source] serde_json::Error),
    #[error("error decoding {0}: {1}")]
    Decode(String, #[source] serde_json::Error),
}
