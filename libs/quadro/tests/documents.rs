//! Document ownership integration tests against the in-memory store.

mod support;

use quadro::{CoreError, Document, Store, User};
use support::{candidate, harness};
use uuid::Uuid;

async fn registered(h: &support::Harness, name: &str) -> User {
    h.accounts
        .register(candidate(name, &format!("{name}@x.com"), "longenough1"))
        .await
        .unwrap()
}

#[tokio::test]
async fn add_document_stamps_owner_and_creation_time() {
    let h = harness();
    let alice = registered(&h, "alice").await;

    let mut doc = Document {
        url: "http://example.com/page".to_string(),
        ..Document::default()
    };
    h.documents.add_document(&alice, &mut doc).await.unwrap();

    assert!(!doc.id.is_nil());
    assert_eq!(doc.owner, alice.id);
    assert_eq!(doc.last_modified, doc.created_at());

    let stored = h.store.find_document(alice.id, doc.id).await.unwrap().unwrap();
    assert_eq!(stored.url, "http://example.com/page");
}

#[tokio::test]
async fn add_document_keeps_an_unparseable_url() {
    let h = harness();
    let alice = registered(&h, "alice").await;

    let mut doc = Document {
        url: "definitely not a url".to_string(),
        ..Document::default()
    };
    h.documents.add_document(&alice, &mut doc).await.unwrap();

    let stored = h.store.find_document(alice.id, doc.id).await.unwrap().unwrap();
    assert_eq!(stored.url, "definitely not a url");
}

#[tokio::test]
async fn add_document_links_declared_parents() {
    let h = harness();
    let alice = registered(&h, "alice").await;

    let mut parent = Document::default();
    h.documents.add_document(&alice, &mut parent).await.unwrap();

    let mut child = Document {
        parents: vec![parent.id],
        ..Document::default()
    };
    h.documents.add_document(&alice, &mut child).await.unwrap();

    let stored = h
        .store
        .find_document(alice.id, parent.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.children, vec![child.id]);
    assert!(stored.last_modified >= parent.last_modified);
}

#[tokio::test]
async fn a_missing_parent_does_not_fail_the_insert() {
    let h = harness();
    let alice = registered(&h, "alice").await;

    let mut doc = Document {
        parents: vec![Uuid::now_v7()],
        ..Document::default()
    };
    h.documents.add_document(&alice, &mut doc).await.unwrap();

    assert!(h.store.find_document(alice.id, doc.id).await.unwrap().is_some());
}

#[tokio::test]
async fn add_child_is_scoped_to_the_recorded_owner() {
    let h = harness();
    let alice = registered(&h, "alice").await;
    let mallory = registered(&h, "mallory").await;

    let mut doc = Document::default();
    h.documents.add_document(&alice, &mut doc).await.unwrap();

    // Mallory claims Alice's document as a parent under their own id
    let forged = Document {
        id: doc.id,
        owner: mallory.id,
        ..Document::default()
    };
    let err = h
        .documents
        .add_child(&forged, Uuid::now_v7())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound));
}

#[tokio::test]
async fn change_owner_transfers_the_document() {
    let h = harness();
    let alice = registered(&h, "alice").await;
    let bob = registered(&h, "bob").await;

    let mut doc = Document::default();
    h.documents.add_document(&alice, &mut doc).await.unwrap();

    h.documents.change_owner(&doc, &bob).await.unwrap();

    assert!(h.store.find_document(bob.id, doc.id).await.unwrap().is_some());
    assert!(h.store.find_document(alice.id, doc.id).await.unwrap().is_none());
}

#[tokio::test]
async fn change_owner_requires_the_current_owner_to_match() {
    let h = harness();
    let alice = registered(&h, "alice").await;
    let bob = registered(&h, "bob").await;

    let mut doc = Document::default();
    h.documents.add_document(&alice, &mut doc).await.unwrap();

    let stale = Document {
        owner: bob.id,
        ..doc.clone()
    };
    let err = h.documents.change_owner(&stale, &bob).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound));
}

#[tokio::test]
async fn delete_document_prefers_the_entered_identifier() {
    let h = harness();
    let alice = registered(&h, "alice").await;

    let mut keep = Document::default();
    h.documents.add_document(&alice, &mut keep).await.unwrap();
    let mut doomed = Document::default();
    h.documents.add_document(&alice, &mut doomed).await.unwrap();

    // The struct points at `keep`, but the entered id names `doomed`
    let request = Document {
        entered_id: doomed.id.to_string(),
        ..keep.clone()
    };
    h.documents.delete_document(&alice, &request).await.unwrap();

    assert!(h.store.find_document(alice.id, keep.id).await.unwrap().is_some());
    assert!(h.store.find_document(alice.id, doomed.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_document_falls_back_to_the_struct_id() {
    let h = harness();
    let alice = registered(&h, "alice").await;

    let mut doc = Document::default();
    h.documents.add_document(&alice, &mut doc).await.unwrap();

    let request = Document {
        entered_id: "garbage".to_string(),
        ..doc.clone()
    };
    h.documents.delete_document(&alice, &request).await.unwrap();
    assert!(h.store.find_document(alice.id, doc.id).await.unwrap().is_none());

    let err = h.documents.delete_document(&alice, &doc).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound));
}

#[tokio::test]
async fn get_document_by_id_rejects_malformed_input_early() {
    let h = harness();
    let alice = registered(&h, "alice").await;

    let err = h
        .documents
        .get_document_by_id(&alice, "not-a-valid-id")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidId(_)));
}

#[tokio::test]
async fn a_missing_document_is_not_an_error() {
    let h = harness();
    let alice = registered(&h, "alice").await;

    let doc = h
        .documents
        .get_document_by_id(&alice, &Uuid::now_v7().to_string())
        .await
        .unwrap();
    assert!(doc.id.is_nil(), "zero-value document, nil error");
}

#[tokio::test]
async fn documents_are_invisible_to_other_owners() {
    let h = harness();
    let alice = registered(&h, "alice").await;
    let bob = registered(&h, "bob").await;

    let mut doc = Document::default();
    h.documents.add_document(&alice, &mut doc).await.unwrap();

    let seen = h
        .documents
        .get_document_by_id(&bob, &doc.id.to_string())
        .await
        .unwrap();
    assert!(seen.id.is_nil());
    assert!(h.documents.documents(&bob).await.unwrap().is_empty());
}

#[tokio::test]
async fn put_document_overwrites_in_full() {
    let h = harness();
    let alice = registered(&h, "alice").await;

    let mut doc = Document {
        title: "before".to_string(),
        ..Document::default()
    };
    h.documents.add_document(&alice, &mut doc).await.unwrap();

    doc.title = "after".to_string();
    doc.tags = vec!["reading".to_string()];
    h.documents.put_document(&alice, &doc).await.unwrap();

    let stored = h.store.find_document(alice.id, doc.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "after");
    assert_eq!(stored.tags, vec!["reading"]);

    // Put is scoped by owner too
    let bob = registered(&h, "bob").await;
    let err = h.documents.put_document(&bob, &doc).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound));
}
