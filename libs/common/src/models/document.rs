//! Document ownership and hierarchy record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::created_from_id;

/// Document ownership and hierarchy record.
///
/// `parents` is supplied at creation time only and never persisted;
/// the stored hierarchy lives in each parent's `children` list.
/// `entered_id` is transient caller input. The `Default` value is the
/// zero-value document returned by "not found is not exceptional"
/// lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "user")]
    pub owner: Uuid,
    #[serde(rename = "furl")]
    pub linked_file: String,
    pub url: String,
    pub title: String,
    /// Ordered child references; every entry must point to an existing
    /// document
    pub children: Vec<Uuid>,
    #[serde(rename = "tag")]
    pub tags: Vec<String>,
    #[serde(rename = "thumb")]
    pub thumb: String,
    #[serde(rename = "thumbm")]
    pub thumb_mobile: String,
    #[serde(rename = "iconurl")]
    pub favicon_url: String,
    #[serde(skip)]
    pub parents: Vec<Uuid>,
    /// Monotonically non-decreasing per document
    #[serde(rename = "lastmod")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Soft-delete marker; modeled but not yet consulted by deletion
    #[serde(rename = "rm")]
    pub to_be_deleted: bool,
    #[serde(skip)]
    pub entered_id: String,
}

impl Document {
    /// Time of creation, derived from the v7 id.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        created_from_id(self.id)
    }
}
