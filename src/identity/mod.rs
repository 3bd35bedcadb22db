//! Identity: who is calling and whether they may.
//! Keep the public surface thin and split implementation across sub-modules.

mod session;
mod provider;
mod authorizer;
mod login;

pub use session::{SessionManager, SessionToken};
pub use provider::{
    classify_sign_in_error, FirebaseDirectory, HttpOAuthExchange, OAuthExchange, OAuthProfile, PasswordCheck,
    ProviderError, TenantDirectory, TenantRecord,
};
pub use authorizer::{ensure_owner_or_admin, require_admin};
pub use login::{complete_login, upsert_tenant_user, verify_tenant, LoginOutcome, NOT_A_TENANT};
