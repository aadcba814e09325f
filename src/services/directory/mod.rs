//! Identity/directory service boundary.
//!
//! The gate never talks to the directory itself; the `User` model builds a
//! client through a `ClientFactory` and hands it the caller's credential.
use std::{fmt, net::IpAddr};

use async_trait::async_trait;
use thiserror::Error;

use crate::services::auth::credential::Credential;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory request failed: {0}")]
    Request(String),
    #[error("role not found: {0}")]
    RoleNotFound(String),
}

/// Fully qualified role id: `account:kind:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleId {
    pub account: String,
    pub kind: String,
    pub name: String,
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.account, self.kind, self.name)
    }
}

/// Audit annotations forwarded with every directory call made on the
/// caller's behalf. Not validated locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditAnnotations {
    pub roles: Vec<String>,
    pub resources: Vec<String>,
}

/// A directory client authenticated as the caller.
#[async_trait]
pub trait DirectoryClient: Send + Sync + Sized {
    type Role: Send;

    /// Elevate subsequent calls to `privilege` (e.g. `elevate`, `reveal`).
    fn with_privilege(self, privilege: &str) -> Self;

    async fn role(&self, id: &RoleId) -> Result<Self::Role, DirectoryError>;

    async fn global_privilege_permitted(&self, privilege: &str) -> Result<bool, DirectoryError>;
}

#[async_trait]
pub trait ClientFactory: Send + Sync {
    type Client: DirectoryClient;

    async fn client_from_credential(
        &self,
        credential: &Credential,
        remote_ip: Option<IpAddr>,
        audit: &AuditAnnotations,
    ) -> Result<Self::Client, DirectoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_id_displays_colon_joined() {
        let id = RoleId {
            account: "acct".into(),
            kind: "host".into(),
            name: "web/01".into(),
        };
        assert_eq!(id.to_string(), "acct:host:web/01");
    }
}
