//! Auth configuration types
//!
//! These types represent the resolved credentials after config file,
//! environment and command-line values have been merged.

/// Authentication configuration
#[derive(Clone, Default)]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,

    /// Personal access token sent as `Authorization: Bearer`
    Bearer {
        /// The access token
        token: String,
    },
}

impl AuthConfig {
    /// Bearer token auth
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Check if any credentials are configured
    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::None)
    }
}

// Secrets never reach logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
        }
    }
}
