//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use quadro::mailer::MailError;
use quadro::{
    AccountManager, DocumentManager, Mailer, MemoryStore, NotificationDispatcher, SignupGate, User,
};

/// Mailer that records every send instead of delivering.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentMail>>,
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub subject: String,
    pub body: String,
    pub recipient: String,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(SentMail {
            subject: subject.to_string(),
            body: body.to_string(),
            recipient: recipient.to_string(),
        });
        Ok(())
    }
}

impl RecordingMailer {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Wait for the dispatcher's background worker to drain `count`
    /// sends, with a bounded poll.
    pub async fn wait_for(&self, count: usize) -> bool {
        for _ in 0..200 {
            if self.sent_count() >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub accounts: AccountManager,
    pub documents: DocumentManager,
    pub gate: SignupGate,
}

/// Wire the managers against a fresh in-memory store and a recording
/// mailer. Must run inside a tokio runtime.
pub fn harness() -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::default());
    let dispatcher = NotificationDispatcher::new(mailer.clone());
    let accounts = AccountManager::new(store.clone(), dispatcher);
    let documents = DocumentManager::new(store.clone());
    let gate = SignupGate::new(store.clone(), accounts.clone());
    Harness {
        store,
        mailer,
        accounts,
        documents,
        gate,
    }
}

/// A registration candidate with the transient entered password set.
pub fn candidate(username: &str, email: &str, password: &str) -> User {
    User {
        username: username.to_string(),
        email: email.to_string(),
        entered_password: password.to_string(),
        ..User::default()
    }
}
