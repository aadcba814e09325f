/*
 * Responsibility
 * - The validated identity of one request (Identity) and the read-only view on it (User)
 * - login / attributes / role id are derived lazily from the credential payload and cached
 * - Building a directory client on the caller's behalf (privilege, caller IP, audit)
 */
use std::net::IpAddr;

use once_cell::sync::OnceCell;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::services::auth::credential::{Credential, json_kind};
use crate::services::directory::{
    AuditAnnotations, ClientFactory, DirectoryClient, DirectoryError, RoleId,
};

const DEFAULT_ROLE_KIND: &str = "user";

#[derive(Debug, Error)]
pub enum UserError {
    #[error("No data field in token")]
    MissingData,
    #[error("No 'login' field in token data")]
    MissingLogin,
    #[error("Expecting String or Hash token data, got {0}")]
    UnexpectedPayload(&'static str),
    #[error("Expecting String login in token data, got {0}")]
    LoginNotString(&'static str),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Everything the authenticator established for the current request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub credential: Credential,
    pub account: String,
    pub privilege: Option<String>,
    pub remote_ip: Option<IpAddr>,
    pub audit: AuditAnnotations,
}

#[derive(Debug)]
struct ParsedPayload {
    login: String,
    attributes: Map<String, Value>,
}

#[derive(Debug)]
pub struct User {
    identity: Identity,
    parsed: OnceCell<ParsedPayload>,
    validated_privilege: tokio::sync::OnceCell<Option<String>>,
}

impl User {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            parsed: OnceCell::new(),
            validated_privilege: tokio::sync::OnceCell::new(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn credential(&self) -> &Credential {
        &self.identity.credential
    }

    pub fn account(&self) -> &str {
        &self.identity.account
    }

    /// Privilege asked for by the caller, not yet checked against the directory.
    pub fn requested_privilege(&self) -> Option<&str> {
        self.identity.privilege.as_deref()
    }

    pub fn remote_ip(&self) -> Option<IpAddr> {
        self.identity.remote_ip
    }

    pub fn audit_roles(&self) -> &[String] {
        &self.identity.audit.roles
    }

    pub fn audit_resources(&self) -> &[String] {
        &self.identity.audit.resources
    }

    pub fn login(&self) -> Result<&str, UserError> {
        Ok(&self.parsed()?.login)
    }

    /// Payload members other than `login`; empty for a bare-string payload.
    pub fn attributes(&self) -> Result<&Map<String, Value>, UserError> {
        Ok(&self.parsed()?.attributes)
    }

    /// `alice` → `account:user:alice`, `host/web/01` → `account:host:web/01`
    pub fn role_id(&self) -> Result<RoleId, UserError> {
        let login = self.login()?;

        let mut tokens: Vec<&str> = login.split('/').collect();
        while tokens.len() > 1 && tokens.last().is_some_and(|t| t.is_empty()) {
            tokens.pop();
        }

        let (kind, name) = match tokens.split_first() {
            Some((kind, rest)) if !rest.is_empty() => (kind.to_string(), rest.join("/")),
            _ => (DEFAULT_ROLE_KIND.to_string(), login.to_string()),
        };

        Ok(RoleId {
            account: self.identity.account.clone(),
            kind,
            name,
        })
    }

    /// The requested privilege, if the directory confirms the caller holds it.
    ///
    /// Queried at most once per request; a refused privilege is `None`.
    pub async fn validated_privilege<C: DirectoryClient>(
        &self,
        client: &C,
    ) -> Result<Option<&str>, DirectoryError> {
        let Some(requested) = self.requested_privilege() else {
            return Ok(None);
        };

        let validated = self
            .validated_privilege
            .get_or_try_init(|| async {
                let permitted = client.global_privilege_permitted(requested).await?;
                if !permitted {
                    tracing::info!(
                        privilege = requested,
                        account = %self.identity.account,
                        "requested privilege not held, ignoring"
                    );
                }
                Ok::<_, DirectoryError>(permitted.then(|| requested.to_string()))
            })
            .await?;

        Ok(validated.as_deref())
    }

    /// Directory client acting as the caller, elevated when the privilege checks out.
    pub async fn build_client<F: ClientFactory>(
        &self,
        factory: &F,
    ) -> Result<F::Client, DirectoryError> {
        let client = factory
            .client_from_credential(
                &self.identity.credential,
                self.identity.remote_ip,
                &self.identity.audit,
            )
            .await?;

        let privilege = self.validated_privilege(&client).await?;
        match privilege {
            Some(privilege) => Ok(client.with_privilege(privilege)),
            None => Ok(client),
        }
    }

    pub async fn role<F: ClientFactory>(
        &self,
        factory: &F,
    ) -> Result<<F::Client as DirectoryClient>::Role, UserError> {
        let id = self.role_id()?;
        let client = self.build_client(factory).await?;
        Ok(client.role(&id).await?)
    }

    fn parsed(&self) -> Result<&ParsedPayload, UserError> {
        self.parsed
            .get_or_try_init(|| parse_payload(self.identity.credential.payload()))
    }
}

// Works on a copy; the credential itself is never modified.
fn parse_payload(payload: Option<&Value>) -> Result<ParsedPayload, UserError> {
    match payload.ok_or(UserError::MissingData)? {
        Value::Null | Value::Bool(false) => Err(UserError::MissingData),
        Value::String(login) => Ok(ParsedPayload {
            login: login.clone(),
            attributes: Map::new(),
        }),
        Value::Object(fields) => {
            let mut attributes = fields.clone();
            match attributes.remove("login") {
                Some(Value::String(login)) => Ok(ParsedPayload { login, attributes }),
                None | Some(Value::Null) => Err(UserError::MissingLogin),
                Some(other) => Err(UserError::LoginNotString(json_kind(&other))),
            }
        }
        other => Err(UserError::UnexpectedPayload(json_kind(other))),
    }
}
