//! User models shared across the ClassConnect services
//!
//! The wire shapes are a platform contract: every service that stores,
//! publishes or verifies users exchanges these JSON documents. Field names
//! and optionality must not change without coordinating all consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user, verified or still pending.
///
/// `verified_at` is absent until the user confirms their email; `location`
/// is omitted from the wire when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
    pub is_blocked: bool,
    pub registration_date: DateTime<Utc>,
    pub role: String,
}

/// A registration waiting on email verification. The PIN is only present
/// while a verification mail is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserToVerify {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pin: String,
    #[serde(rename = "created_at")]
    pub creation_time: DateTime<Utc>,
}

/// The user-editable profile. Unset fields serialize as `null` so consumers
/// can distinguish "cleared" from "omitted".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub location: Option<String>,
    pub profile_picture: Option<String>,
    pub biography: Option<String>,
}

/// Failed-login bookkeeping backing the lockout policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttempts {
    pub user_id: String,
    pub failed_attempts: i32,
    pub lock_time: Option<DateTime<Utc>>,
    pub lock_count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn unverified_user_omits_optional_fields() {
        let user = User {
            id: "u1".into(),
            name: "Ana".into(),
            email: "ana@classconnect.io".into(),
            password: "hashed".into(),
            verified_at: None,
            location: String::new(),
            is_blocked: false,
            registration_date: sample_time(),
            role: "user".into(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("verified_at").is_none());
        assert!(json.get("location").is_none());
        assert_eq!(json["is_blocked"], false);
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn verified_user_round_trips() {
        let user = User {
            id: "u1".into(),
            name: "Ana".into(),
            email: "ana@classconnect.io".into(),
            password: "hashed".into(),
            verified_at: Some(sample_time()),
            location: "Buenos Aires".into(),
            is_blocked: true,
            registration_date: sample_time(),
            role: "admin".into(),
        };

        let json = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn user_to_verify_uses_created_at_wire_name() {
        let pending = UserToVerify {
            id: "u2".into(),
            name: "Ben".into(),
            email: "ben@classconnect.io".into(),
            password: "hashed".into(),
            location: "Córdoba".into(),
            pin: "004217".into(),
            creation_time: sample_time(),
        };

        let json = serde_json::to_value(&pending).unwrap();
        assert!(json.get("created_at").is_some());
        assert!(json.get("creation_time").is_none());
        assert_eq!(json["pin"], "004217");
    }

    #[test]
    fn user_to_verify_omits_empty_pin() {
        let pending = UserToVerify {
            id: "u2".into(),
            name: "Ben".into(),
            email: "ben@classconnect.io".into(),
            password: "hashed".into(),
            location: String::new(),
            pin: String::new(),
            creation_time: sample_time(),
        };

        let json = serde_json::to_value(&pending).unwrap();
        assert!(json.get("pin").is_none());
    }

    #[test]
    fn profile_keeps_explicit_nulls() {
        let profile = UserProfile {
            user_id: "u1".into(),
            name: "Ana".into(),
            location: None,
            profile_picture: Some("https://cdn.classconnect.io/p/u1.png".into()),
            biography: None,
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert!(json["location"].is_null());
        assert!(json["biography"].is_null());
        assert_eq!(json["profile_picture"], "https://cdn.classconnect.io/p/u1.png");
    }

    #[test]
    fn login_attempts_round_trip() {
        let attempts = LoginAttempts {
            user_id: "u1".into(),
            failed_attempts: 3,
            lock_time: Some(sample_time()),
            lock_count: 1,
        };

        let json = serde_json::to_string(&attempts).unwrap();
        let back: LoginAttempts = serde_json::from_str(&json).unwrap();
        assert_eq!(back, attempts);

        let fresh: LoginAttempts = serde_json::from_str(
            r#"{"user_id":"u2","failed_attempts":0,"lock_time":null,"lock_count":0}"#,
        )
        .unwrap();
        assert!(fresh.lock_time.is_none());
    }
}
