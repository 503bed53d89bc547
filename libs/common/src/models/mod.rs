//! Record models persisted by the store

mod document;
mod signup_code;
mod user;

pub use document::Document;
pub use signup_code::SignupCode;
pub use user::User;
