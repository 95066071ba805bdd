//! Domain events published to the `stats` exchange.
//!
//! Wire format: the JSON payload carries only the event fields; the
//! discriminator travels in the `type` message header. Field names are part
//! of the wire contract and must not change.

use crate::CodecError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload for events that reference a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserEvent {
    pub user_id: String,
}

/// Payload for platform-wide user-count gauges.
///
/// The legacy producers serialize the bare field name, so `Number` (not
/// `number`) is the wire name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserGauge {
    #[serde(rename = "Number")]
    pub number: u64,
}

/// Account state observed during a failed login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Registered,
    Verified,
    NotExists,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "not verified",
            Self::Verified => "verified",
            Self::NotExists => "not registered",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for failed login attempts. The wire name of the status field is
/// `exists`, inherited from the legacy producers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FailedLogin {
    pub email: String,
    #[serde(rename = "exists")]
    pub status: String,
}

impl FailedLogin {
    pub fn new(email: impl Into<String>, status: AccountStatus) -> Self {
        Self { email: email.into(), status: status.as_str().to_string() }
    }
}

/// The closed set of domain events emitted by ClassConnect services.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    UserRegistered(UserEvent),
    UserVerified(UserEvent),
    UserLoggedIn(UserEvent),
    UserBanned(UserEvent),
    UserUnbanned(UserEvent),
    UserBlocked(UserEvent),
    UserUnblocked(UserEvent),
    UserProfileUpdated(UserEvent),
    UpdateUserProfile(UserEvent),
    UserStartedPasswordRecovery(UserEvent),
    UserRecoveredPassword(UserEvent),
    AdminRegistered(UserEvent),
    AdminLoggedIn(UserEvent),
    UserFailedLogInAttempt(FailedLogin),
    UpdateUsersActive(UserGauge),
    UpdateUsersBanned(UserGauge),
    UpdateUsersBlocked(UserGauge),
    UpdateUsersPendingVerification(UserGauge),
}

fn parse<T: DeserializeOwned>(kind: &str, body: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(body).map_err(|e| CodecError::Decode(kind.to_string(), e))
}

impl DomainEvent {
    /// Stable discriminator carried in the `type` message header.
    pub fn discriminator(&self) -> &'static str {
        match self {
            Self::UserRegistered(_) => "UserRegistered",
            Self::UserVerified(_) => "UserVerified",
            Self::UserLoggedIn(_) => "UserLoggedIn",
            Self::UserBanned(_) => "UserBanned",
            Self::UserUnbanned(_) => "UserUnbanned",
            Self::UserBlocked(_) => "UserBlocked",
            Self::UserUnblocked(_) => "UserUnblocked",
            Self::UserProfileUpdated(_) => "UserProfileUpdated",
            Self::UpdateUserProfile(_) => "UpdateUserProfile",
            Self::UserStartedPasswordRecovery(_) => "UserStartedPasswordRecovery",
            Self::UserRecoveredPassword(_) => "UserRecoveredPassword",
            Self::AdminRegistered(_) => "AdminRegistered",
            Self::AdminLoggedIn(_) => "AdminLoggedIn",
            Self::UserFailedLogInAttempt(_) => "UserFailedLogInAttempt",
            Self::UpdateUsersActive(_) => "UpdateUsersActive",
            Self::UpdateUsersBanned(_) => "UpdateUsersBanned",
            Self::UpdateUsersBlocked(_) => "UpdateUsersBlocked",
            Self::UpdateUsersPendingVerification(_) => "UpdateUsersPendingVerification",
        }
    }

    /// Serialize the payload fields to JSON bytes.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let encoded = match self {
            Self::UserRegistered(p)
            | Self::UserVerified(p)
            | Self::UserLoggedIn(p)
            | Self::UserBanned(p)
            | Self::UserUnbanned(p)
            | Self::UserBlocked(p)
            | Self::UserUnblocked(p)
            | Self::UserProfileUpdated(p)
            | Self::UpdateUserProfile(p)
            | Self::UserStartedPasswordRecovery(p)
            | Self::UserRecoveredPassword(p)
            | Self::AdminRegistered(p)
            | Self::AdminLoggedIn(p) => serde_json::to_vec(p),
            Self::UserFailedLogInAttempt(p) => serde_json::to_vec(p),
            Self::UpdateUsersActive(p)
            | Self::UpdateUsersBanned(p)
            | Self::UpdateUsersBlocked(p)
            | Self::UpdateUsersPendingVerification(p) => serde_json::to_vec(p),
        };
        encoded.map_err(|e| CodecError::Encode(self.discriminator().to_string(), e))
    }

    /// Decode a payload tagged by `discriminator`. Unknown discriminators and
    /// schema mismatches are errors.
    pub fn decode(discriminator: &str, body: &[u8]) -> Result<Self, CodecError> {
        match discriminator {
            "UserRegistered" => Ok(Self::UserRegistered(parse(discriminator, body)?)),
            "UserVerified" => Ok(Self::UserVerified(parse(discriminator, body)?)),
            "UserLoggedIn" => Ok(Self::UserLoggedIn(parse(discriminator, body)?)),
            "UserBanned" => Ok(Self::UserBanned(parse(discriminator, body)?)),
            "UserUnbanned" => Ok(Self::UserUnbanned(parse(discriminator, body)?)),
            "UserBlocked" => Ok(Self::UserBlocked(parse(discriminator, body)?)),
            "UserUnblocked" => Ok(Self::UserUnblocked(parse(discriminator, body)?)),
            "UserProfileUpdated" => Ok(Self::UserProfileUpdated(parse(discriminator, body)?)),
            "UpdateUserProfile" => Ok(Self::UpdateUserProfile(parse(discriminator, body)?)),
            "UserStartedPasswordRecovery" => {
                Ok(Self::UserStartedPasswordRecovery(parse(discriminator, body)?))
            }
            "UserRecoveredPassword" => Ok(Self::UserRecoveredPassword(parse(discriminator, body)?)),
            "AdminRegistered" => Ok(Self::AdminRegistered(parse(discriminator, body)?)),
            "AdminLoggedIn" => Ok(Self::AdminLoggedIn(parse(discriminator, body)?)),
            "UserFailedLogInAttempt" => {
                Ok(Self::UserFailedLogInAttempt(parse(discriminator, body)?))
            }
            "UpdateUsersActive" => Ok(Self::UpdateUsersActive(parse(discriminator, body)?)),
            "UpdateUsersBanned" => Ok(Self::UpdateUsersBanned(parse(discriminator, body)?)),
            "UpdateUsersBlocked" => Ok(Self::UpdateUsersBlocked(parse(discriminator, body)?)),
            "UpdateUsersPendingVerification" => {
                Ok(Self::UpdateUsersPendingVerification(parse(discriminator, body)?))
            }
            other => Err(CodecError::UnknownType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events() -> Vec<DomainEvent> {
        vec![
            DomainEvent::UserRegistered(UserEvent { user_id: "u1".into() }),
            DomainEvent::UserVerified(UserEvent { user_id: "u2".into() }),
            DomainEvent::UserLoggedIn(UserEvent { user_id: "u3".into() }),
            DomainEvent::UserBanned(UserEvent { user_id: "u4".into() }),
            DomainEvent::UserUnbanned(UserEvent { user_id: "u4".into() }),
            DomainEvent::UserBlocked(UserEvent { user_id: "u5".into() }),
            DomainEvent::UserUnblocked(UserEvent { user_id: "u5".into() }),
            DomainEvent::UserProfileUpdated(UserEvent { user_id: "u6".into() }),
            DomainEvent::UpdateUserProfile(UserEvent { user_id: "u6".into() }),
            DomainEvent::UserStartedPasswordRecovery(UserEvent { user_id: "u7".into() }),
            DomainEvent::UserRecoveredPassword(UserEvent { user_id: "u7".into() }),
            DomainEvent::AdminRegistered(UserEvent { user_id: "a1".into() }),
            DomainEvent::AdminLoggedIn(UserEvent { user_id: "a1".into() }),
            DomainEvent::UserFailedLogInAttempt(FailedLogin::new(
                "ana@classconnect.test",
                AccountStatus::Registered,
            )),
            DomainEvent::UpdateUsersActive(UserGauge { number: 12 }),
            DomainEvent::UpdateUsersBanned(UserGauge { number: 3 }),
            DomainEvent::UpdateUsersBlocked(UserGauge { number: 1 }),
            DomainEvent::UpdateUsersPendingVerification(UserGauge { number: 7 }),
        ]
    }

    #[test]
    fn discriminators_are_unique() {
        let events = sample_events();
        let mut seen = std::collections::HashSet::new();
        for event in &events {
            assert!(seen.insert(event.discriminator()), "duplicate: {}", event.discriminator());
        }
        assert_eq!(seen.len(), 18);
    }

    #[test]
    fn encode_decode_round_trips_every_variant() {
        for event in sample_events() {
            let body = event.encode().unwrap();
            let decoded = DomainEvent::decode(event.discriminator(), &body).unwrap();
            assert_eq!(decoded, event);
        }
    }

    #[test]
    fn unknown_discriminator_is_an_error() {
        let err = DomainEvent::decode("NoSuchEvent", b"{}").unwrap_err();
        assert!(matches!(err, CodecError::UnknownType(t) if t == "NoSuchEvent"));
    }

    #[test]
    fn gauge_payload_uses_capitalized_wire_name() {
        let event = DomainEvent::UpdateUsersActive(UserGauge { number: 42 });
        let body = event.encode().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["Number"], 42);
    }

    #[test]
    fn failed_login_status_renders_legacy_strings() {
        assert_eq!(AccountStatus::Registered.as_str(), "not verified");
        assert_eq!(AccountStatus::Verified.as_str(), "verified");
        assert_eq!(AccountStatus::NotExists.as_str(), "not registered");

        let event = DomainEvent::UserFailedLogInAttempt(FailedLogin::new(
            "x@y.z",
            AccountStatus::NotExists,
        ));
        let value: serde_json::Value = serde_json::from_slice(&event.encode().unwrap()).unwrap();
        assert_eq!(value["exists"], "not registered");
    }

    #[test]
    fn decode_rejects_unexpected_fields() {
        let err = DomainEvent::decode("UserRegistered", br#"{"user_id":"u1","extra":true}"#)
            .unwrap_err();
        assert!(matches!(err, CodecError::Decode(kind, _) if kind == "UserRegistered"));
    }

    #[test]
    fn decode_rejects_missing_fields() {
        let err = DomainEvent::decode("UserRegistered", b"{}").unwrap_err();
        assert!(matches!(err, CodecError::Decode(_, _)));
    }
}
