//! Shared persistence layer for the quadro workspace
//!
//! This crate provides the record models, the document-store contract
//! implemented by storage backends, and an in-memory reference backend
//! used by tests and single-process deployments.

pub mod error;
pub mod memory;
pub mod models;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use models::{Document, SignupCode, User};
pub use store::Store;
