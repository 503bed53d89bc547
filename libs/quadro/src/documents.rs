//! Document ownership: creation, hierarchy linking, transfer, and
//! removal

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use common::{Document, Store, User};

use crate::error::{CoreError, CoreResult, ignore_on_failure};

/// Basic URL checking. Lenient by policy: when the string doesn't
/// parse, the failure is logged and the original string kept.
fn sanitize_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(parsed) => parsed.into(),
        Err(err) => {
            debug!(%err, url = raw, "url failed to parse, keeping original");
            raw.to_string()
        }
    }
}

/// Human-friendly display name for a document, limited to `max_len`
/// bytes with an ellipsis suffix when `max_len > 0`. The cut is a
/// plain byte cut, not content-aware; a multi-byte character on the
/// boundary comes out lossy.
pub fn name_preview(doc: &Document, max_len: usize) -> String {
    let name = if doc.title.is_empty() {
        &doc.url
    } else {
        &doc.title
    };
    if max_len > 0 && name.len() > max_len {
        let cut = String::from_utf8_lossy(&name.as_bytes()[..max_len]);
        return format!("{cut}...");
    }
    name.clone()
}

/// Coordinates document mutations against the store.
#[derive(Clone)]
pub struct DocumentManager {
    store: Arc<dyn Store>,
}

impl DocumentManager {
    /// Create a new document manager.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Persist a new document owned by the acting user.
    ///
    /// Assigns a fresh id, stamps the owner and the id-derived
    /// creation time, sanitizes the URL, inserts, then links the
    /// document under each declared parent. Parent linking is
    /// best-effort and never rolls back the insert.
    pub async fn add_document(&self, owner: &User, doc: &mut Document) -> CoreResult<()> {
        doc.id = Uuid::now_v7();
        doc.owner = owner.id;
        doc.url = sanitize_url(&doc.url);
        doc.last_modified = doc.created_at();
        info!(doc = %doc.id, owner = %owner.id, "adding document");

        self.store.insert_document(doc).await?;

        for parent_id in doc.parents.clone() {
            let parent = Document {
                id: parent_id,
                owner: owner.id,
                ..Document::default()
            };
            ignore_on_failure(self.add_child(&parent, doc.id).await, "link to parent");
        }
        Ok(())
    }

    /// Append a child to the parent's child list and bump the parent's
    /// last-modified time. The parent is reloaded scoped to its
    /// recorded owner, so a caller can't link into another owner's
    /// document.
    pub async fn add_child(&self, parent: &Document, child: Uuid) -> CoreResult<()> {
        let mut parent = self
            .store
            .find_document(parent.owner, parent.id)
            .await?
            .ok_or(CoreError::NotFound)?;
        parent.children.push(child);
        parent.last_modified = Some(Utc::now());
        self.store.update_document(parent.owner, &parent).await?;
        Ok(())
    }

    /// Rewrite the document's owner and last-modified, matched on id
    /// and current owner. No authorization check happens here beyond
    /// the caller already knowing the current owner; enforcing who may
    /// transfer is the caller's policy.
    pub async fn change_owner(&self, doc: &Document, new_owner: &User) -> CoreResult<()> {
        let changed = self
            .store
            .set_document_owner(doc.id, doc.owner, new_owner.id, Utc::now())
            .await?;
        if changed == 0 {
            return Err(CoreError::NotFound);
        }
        info!(doc = %doc.id, new_owner = %new_owner.id, "document owner changed");
        Ok(())
    }

    /// Remove a document owned by the user. A caller-entered
    /// identifier takes precedence when it resolves; otherwise the
    /// identifier already on the struct is used.
    ///
    /// This is a hard delete today. The soft-delete flag on
    /// [`Document`] is the intended mark-then-reap replacement; it is
    /// not consulted yet.
    pub async fn delete_document(&self, user: &User, doc: &Document) -> CoreResult<()> {
        let mut target = doc.id;
        if !doc.entered_id.is_empty() {
            if let Ok(found) = self.get_document_by_id(user, &doc.entered_id).await {
                if !found.id.is_nil() {
                    target = found.id;
                }
            }
        }

        let removed = self.store.remove_document(user.id, target).await?;
        if removed == 0 {
            return Err(CoreError::NotFound);
        }
        info!(doc = %target, owner = %user.id, "document removed");
        Ok(())
    }

    /// Fetch one of the user's documents by the textual form of its
    /// id. A malformed id is rejected before any storage round-trip. A
    /// missing document is not exceptional: the zero-value document
    /// comes back with `Ok`, and callers test `id` for nil.
    pub async fn get_document_by_id(&self, user: &User, id: &str) -> CoreResult<Document> {
        let id = Uuid::parse_str(id).map_err(|_| CoreError::InvalidId(id.to_string()))?;
        Ok(self
            .store
            .find_document(user.id, id)
            .await?
            .unwrap_or_default())
    }

    /// Every document owned by the user.
    pub async fn documents(&self, user: &User) -> CoreResult<Vec<Document>> {
        Ok(self.store.find_documents_by_owner(user.id).await?)
    }

    /// Full-overwrite (PUT) modifier, matched on id and owner.
    pub async fn put_document(&self, user: &User, doc: &Document) -> CoreResult<()> {
        self.store.update_document(user.id, doc).await?;
        Ok(())
    }
}
