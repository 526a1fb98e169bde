//! Authentication module
//!
//! Requests carry a personal access token as a bearer credential, plus the
//! organization scope header when one is configured.
//!
//! The `Authenticator` applies credentials to every outgoing request.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, ORGANIZATION_HEADER};
pub use types::AuthConfig;
