//! Domain primitives, capability ports and orchestration.
//!
//! Purpose: keep the backend-system facade and the account lifecycle free of
//! transport details. Adapters in `outbound` implement the ports defined in
//! [`ports`]; the facade and bootstrap flow only see those traits.
//!
//! Public surface:
//! - Response: uniform success/error/data result of every remote operation.
//! - User: the account known to the Accounts capability.
//! - AccountState: lifecycle states driven by the bootstrap flow.
//! - BackendSystem: generic facade composing Accounts/CloudCode/Database.
//! - AccountBootstrap: sign-up-then-sign-in orchestration.

pub mod account_state;
pub mod auth;
pub mod backend_system;
pub mod bootstrap;
pub mod error;
pub mod events;
pub mod identity_accounts;
pub mod identity_client;
pub mod ports;
pub mod response;
pub mod user;

pub use self::account_state::AccountState;
pub use self::auth::{AccountCredentials, CredentialsValidationError};
pub use self::backend_system::BackendSystem;
pub use self::bootstrap::{AccountBootstrap, BootstrapReport};
pub use self::error::NotInitializedError;
pub use self::events::{ListenerId, Listeners};
pub use self::identity_accounts::IdentityAccounts;
pub use self::identity_client::IdentityProviderClient;
pub use self::response::Response;
pub use self::user::User;
