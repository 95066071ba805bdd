//! Presentation projections shared by all notification variants.

use serde::{Deserialize, Serialize};

/// A rendered email: subject line plus HTML body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub subject: String,
    pub body: String,
}

/// A rendered push notification: short title plus one-line text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushNotification {
    pub title: String,
    pub text: String,
}
