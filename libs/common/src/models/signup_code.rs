//! Invitation codes that gate registration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Invitation record. A code string is not unique across records; a
/// code is consumable at most once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupCode {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "is_email_bound")]
    pub email_bound: bool,
    /// Meaningful only when `email_bound` is set
    pub email: String,
    pub code: String,
    /// `None` means unused
    pub used_at: Option<DateTime<Utc>>,
}

impl SignupCode {
    /// New open code, redeemable by anyone who knows the string.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            code: code.into(),
            ..Self::default()
        }
    }

    /// New code bound to a single email address.
    pub fn bound_to(code: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            email_bound: true,
            email: email.into(),
            ..Self::new(code)
        }
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }
}
