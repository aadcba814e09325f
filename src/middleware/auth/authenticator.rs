//! Authenticator middleware: path policy → credential → signer → identity.
//!
//! Every request ends up in exactly one of:
//! - the fixed 401 response (no downstream call), or
//! - one downstream call, run inside an identity scope that is released
//!   when the call returns, fails or is cancelled.
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    Router,
    body::Body,
    extract::{ConnectInfo, OriginalUri, State},
    http::{HeaderMap, HeaderValue, Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::middleware::auth::{
    headers as request_headers,
    policy::{AuthMode, PathPolicy},
    remote_ip::RemoteIpResolver,
};
use crate::services::auth::{
    context,
    credential::{CredentialError, decode_authorization},
    signer::{SignerError, SignerResolver, account_for_signer},
    user::{Identity, User},
};
use crate::services::directory::AuditAnnotations;

/// Reasons a request is turned away. All of them answer 401; the variant
/// only shows up in logs.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization missing")]
    MissingCredential,
    #[error("Malformed authorization token")]
    MalformedCredential(#[source] CredentialError),
    #[error("Unauthorized: Invalid token")]
    UnresolvableSigner,
    #[error("Unauthorized: Invalid token")]
    InvalidSignerShape(String),
    #[error("Unauthorized: Invalid token")]
    UnconfiguredOwnAccount,
}

impl From<SignerError> for AuthError {
    fn from(e: SignerError) -> Self {
        match e {
            SignerError::InvalidShape(signer) => AuthError::InvalidSignerShape(signer),
            SignerError::UnconfiguredOwnAccount => AuthError::UnconfiguredOwnAccount,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let mut res = (StatusCode::UNAUTHORIZED, message.clone()).into_response();
        let headers = res.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(message.len()));
        res
    }
}

pub struct Authenticator {
    policy: PathPolicy,
    signers: Arc<dyn SignerResolver>,
    remote_ip: Arc<dyn RemoteIpResolver>,
    own_account: Option<String>,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("policy", &self.policy)
            .field("own_account", &self.own_account)
            .finish()
    }
}

impl Authenticator {
    pub fn new(
        policy: PathPolicy,
        signers: Arc<dyn SignerResolver>,
        remote_ip: Arc<dyn RemoteIpResolver>,
        own_account: Option<String>,
    ) -> Self {
        Self {
            policy,
            signers,
            remote_ip,
            own_account: own_account.filter(|a| !a.is_empty()),
        }
    }

    pub fn policy(&self) -> &PathPolicy {
        &self.policy
    }

    /// Decide the identity for one request.
    ///
    /// - `Ok(None)`: skipped, or optional path without a credential
    /// - `Ok(Some(_))`: credential verified
    /// - `Err(_)`: reject with 401
    pub async fn authenticate(
        &self,
        path: &str,
        headers: &HeaderMap,
        peer: Option<IpAddr>,
    ) -> Result<Option<User>, AuthError> {
        let mode = self.policy.mode(path);
        if mode == AuthMode::Skip {
            return Ok(None);
        }

        let credential = match decode_authorization(request_headers::authorization(headers)) {
            Ok(Some(credential)) => credential,
            Ok(None) if mode == AuthMode::Optional => return Ok(None),
            Ok(None) => return Err(AuthError::MissingCredential),
            Err(err) => return Err(AuthError::MalformedCredential(err)),
        };

        let signer = self
            .signers
            .resolve_signer(&credential)
            .await
            .ok_or(AuthError::UnresolvableSigner)?;
        let account = account_for_signer(&signer, self.own_account.as_deref())?;

        Ok(Some(User::new(Identity {
            credential,
            account,
            privilege: request_headers::privilege(headers),
            remote_ip: self.remote_ip.resolve(peer, headers),
            audit: AuditAnnotations {
                roles: request_headers::audit_ids(headers, &request_headers::AUDIT_ROLES),
                resources: request_headers::audit_ids(headers, &request_headers::AUDIT_RESOURCES),
            },
        })))
    }
}

/// Put the authenticator in front of every route of `router`.
///
/// Apply it to the outermost router so the policy sees the full path.
pub fn apply<S>(router: Router<S>, authenticator: Arc<Authenticator>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(
        authenticator,
        authenticate_middleware,
    ))
}

async fn authenticate_middleware(
    State(authenticator): State<Arc<Authenticator>>,
    OriginalUri(original_uri): OriginalUri,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = original_uri.path();
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let user = match authenticator.authenticate(path, req.headers(), peer).await {
        Ok(user) => user,
        Err(err) => {
            tracing::warn!(
                path,
                error = ?err,
                "request rejected: {err}"
            );
            return err.into_response();
        }
    };

    if let Some(user) = &user {
        tracing::debug!(path, account = user.account(), "identity established");
    }

    // Downstream always runs inside a scope, so nothing from an earlier
    // request on this worker can be observed.
    context::scope(user, next.run(req)).await
}
