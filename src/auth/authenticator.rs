//! Authenticator implementation
//!
//! Applies credentials and the organization scope to request builders.

use super::types::AuthConfig;
use crate::types::OptionStringExt;
use reqwest::RequestBuilder;

/// Header carrying the organization scope
pub const ORGANIZATION_HEADER: &str = "X-Organization-ID";

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// Organization the requests are billed and scoped to
    organization_id: Option<String>,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            organization_id: None,
        }
    }

    /// Scope all requests to an organization
    #[must_use]
    pub fn with_organization(mut self, organization_id: Option<String>) -> Self {
        self.organization_id = organization_id.none_if_empty();
        self
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        let req = match &self.config {
            AuthConfig::None => req,
            AuthConfig::Bearer { token } => req.bearer_auth(token),
        };

        match &self.organization_id {
            Some(org) => req.header(ORGANIZATION_HEADER, org.as_str()),
            None => req,
        }
    }

    /// Get the organization scope
    pub fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }
}
