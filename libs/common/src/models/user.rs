//! User identity record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User identity record.
///
/// Serialized field names follow the historical storage schema so
/// consumers reading raw records keep working. `entered_password` is
/// transient request state and is never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub location: String,
    pub url: String,
    pub email: String,
    pub email_verified: bool,
    pub is_registered: bool,
    pub has_password: bool,
    pub is_active: bool,
    /// Password hash, opaque to everything but the credential layer
    pub password: Vec<u8>,
    /// Extra salt appended to the plaintext before hashing, kept
    /// separately from the hash algorithm's own salting
    pub salt: Vec<u8>,
    /// External identity reference, e.g. an OAuth subject
    #[serde(rename = "google_oauth_sub")]
    pub oauth_sub: String,
    pub last_login: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub entered_password: String,
    /// Signup code consumed at registration, if any
    pub signup_code: Option<Uuid>,
    /// Email verification code handed out at registration
    pub confirm_code: String,
    /// Integer role tier
    pub role: i32,
    /// Failed-login counter, best-effort telemetry
    pub fails: i32,
}

impl User {
    /// Create an unregistered placeholder account. The username is the
    /// id's simple-hex form until the person picks a real one.
    pub fn anonymous() -> Self {
        let id = Uuid::now_v7();
        Self {
            id,
            username: id.simple().to_string(),
            ..Self::default()
        }
    }

    /// Whether the username is still the auto-generated placeholder.
    pub fn is_anonymous(&self) -> bool {
        self.username == self.id.simple().to_string()
    }

    /// Time of creation, derived from the v7 id. `None` for records
    /// whose id carries no timestamp (e.g. the zero value).
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        created_from_id(self.id)
    }
}

pub(crate) fn created_from_id(id: Uuid) -> Option<DateTime<Utc>> {
    let ts = id.get_timestamp()?;
    let (secs, nanos) = ts.to_unix();
    DateTime::from_timestamp(i64::try_from(secs).ok()?, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_user_has_placeholder_username() {
        let user = User::anonymous();
        assert!(user.is_anonymous());
        assert_eq!(user.username, user.id.simple().to_string());

        let mut named = user.clone();
        named.username = "alice".to_string();
        assert!(!named.is_anonymous());
    }

    #[test]
    fn created_at_comes_from_the_id() {
        let user = User::anonymous();
        let created = user.created_at().expect("v7 id carries a timestamp");
        let drift = (Utc::now() - created).num_seconds().abs();
        assert!(drift < 5, "creation time should be about now");

        assert_eq!(User::default().created_at(), None);
    }

    #[test]
    fn entered_password_is_never_serialized() {
        let user = User {
            entered_password: "hunter22".to_string(),
            oauth_sub: "sub-123".to_string(),
            ..User::anonymous()
        };
        let json = serde_json::to_value(&user).expect("serialize");
        assert!(json.get("entered_password").is_none());
        assert_eq!(json["google_oauth_sub"], "sub-123");
        assert!(json.get("_id").is_some());
    }
}
