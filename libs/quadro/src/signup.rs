//! Signup gate: invitation codes that authorize registration
//!
//! A code grants signup either to a person holding the code string, or
//! to one specific email address.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use common::{SignupCode, Store, User};

use crate::accounts::AccountManager;
use crate::error::{CoreError, CoreResult, ignore_on_failure};

/// Validates presented signup codes and performs the gated
/// registration.
#[derive(Clone)]
pub struct SignupGate {
    store: Arc<dyn Store>,
    accounts: AccountManager,
}

impl SignupGate {
    /// Create a new signup gate.
    pub fn new(store: Arc<dyn Store>, accounts: AccountManager) -> Self {
        Self { store, accounts }
    }

    /// Save a new code. Administrative operation.
    pub async fn persist_code(&self, code: &SignupCode) -> CoreResult<()> {
        self.store.insert_signup_code(code).await?;
        Ok(())
    }

    /// Redeem `code` for the candidate and register the account.
    ///
    /// The first stored code that shares the string, is unused, and is
    /// either unbound or bound to the candidate's email wins. The code
    /// is marked used before registration runs, so a concurrent
    /// redemption of the same code loses; a failed registration puts
    /// the code back (best-effort compensation).
    //
    // TODO: fold the mark-used and register writes into a single store
    // transaction once the backend contract grows one; until then a
    // crash between the two writes can burn a code without creating an
    // account.
    pub async fn redeem_code(&self, candidate: User, code: &str) -> CoreResult<User> {
        info!(code, username = %candidate.username, "redeeming signup code");

        let matches = self.store.find_signup_codes(code).await?;
        let eligible = matches
            .into_iter()
            .find(|sc| !sc.is_used() && (!sc.email_bound || sc.email == candidate.email));
        let Some(mut sc) = eligible else {
            return Err(CoreError::CodeNotRecognized);
        };

        sc.used_at = Some(Utc::now());
        self.store.update_signup_code(&sc).await?;

        let mut candidate = candidate;
        candidate.signup_code = Some(sc.id);
        match self.accounts.register(candidate).await {
            Ok(user) => Ok(user),
            Err(err) => {
                sc.used_at = None;
                ignore_on_failure(
                    self.store.update_signup_code(&sc).await,
                    "signup code rollback",
                );
                Err(err)
            }
        }
    }
}
