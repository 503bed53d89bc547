//! Identity and ownership core for the quadro document service
//!
//! This library governs how a person becomes a recognized account
//! holder, how credentials are verified, how two accounts merge into
//! one, and how documents are owned, linked into parent/child
//! hierarchies, and transferred between owners.
//!
//! Persistence and mail delivery are collaborators injected at
//! construction: any [`Store`] backend and any [`Mailer`]. There is no
//! ambient global state; each manager holds exactly what it was built
//! with.

pub mod accounts;
pub mod config;
pub mod credentials;
pub mod documents;
pub mod error;
pub mod mailer;
pub mod signup;
pub mod validation;

pub use accounts::AccountManager;
pub use common::{Document, MemoryStore, SignupCode, Store, StoreError, User};
pub use config::{CoreConfig, MailConfig};
pub use documents::DocumentManager;
pub use error::{CoreError, CoreResult};
pub use mailer::{Mailer, NotificationDispatcher, SmtpMailer};
pub use signup::SignupGate;
