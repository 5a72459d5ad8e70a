//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts;
mod cloud_code;
mod database;
mod identity_provider;
mod status_sink;

pub use accounts::{Accounts, AccountsEvents};
pub use cloud_code::CloudCode;
pub use database::Database;
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{
    APP_VERSION_ATTRIBUTE, AuthTokens, FIXTURE_ID_TOKEN, FixtureIdentityProvider,
    IdentityProvider, IdentityProviderError, NICKNAME_ATTRIBUTE, PasswordAuthRequest,
    RegistrationOutcome, RegistrationRequest, UserAttribute,
};
pub use status_sink::{NullStatusSink, StatusSink};
