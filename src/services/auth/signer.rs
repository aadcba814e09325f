//! Signer resolution seam and signer → account mapping.
use async_trait::async_trait;

use crate::services::auth::credential::Credential;

const AUTHN_PREFIX: &str = "authn:";
const OWN_SIGNER: &str = "own";

/// Signature engine boundary.
///
/// Returns the id of the key holder that signed `credential`, or `None` when
/// the credential was not produced by any trusted signer. No retries: a `None`
/// is final for the request.
#[async_trait]
pub trait SignerResolver: Send + Sync {
    async fn resolve_signer(&self, credential: &Credential) -> Option<String>;
}

/// Account derived from a resolved signer id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerAccount {
    /// `authn:<account>`
    Authn(String),
    /// `own`, this service's operator identity
    Own,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignerError {
    #[error("unrecognized signer '{0}'")]
    InvalidShape(String),
    #[error("signer is 'own' but no own account is configured")]
    UnconfiguredOwnAccount,
}

impl SignerAccount {
    pub fn parse(signer: &str) -> Result<Self, SignerError> {
        if signer == OWN_SIGNER {
            return Ok(Self::Own);
        }
        match signer.strip_prefix(AUTHN_PREFIX) {
            Some(account) if !account.is_empty() => Ok(Self::Authn(account.to_string())),
            _ => Err(SignerError::InvalidShape(signer.to_string())),
        }
    }

    /// Resolve to a concrete account; `own_account` is the process-wide setting.
    pub fn into_account(self, own_account: Option<&str>) -> Result<String, SignerError> {
        match self {
            Self::Authn(account) => Ok(account),
            Self::Own => own_account
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .ok_or(SignerError::UnconfiguredOwnAccount),
        }
    }
}

/// `SignerAccount::parse` + `into_account` in one step.
pub fn account_for_signer(signer: &str, own_account: Option<&str>) -> Result<String, SignerError> {
    SignerAccount::parse(signer)?.into_account(own_account)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authn_signer_yields_account() {
        assert_eq!(
            account_for_signer("authn:someacc", None),
            Ok("someacc".to_string())
        );
        // everything after the prefix belongs to the account
        assert_eq!(
            account_for_signer("authn:a:b", None),
            Ok("a:b".to_string())
        );
    }

    #[test]
    fn own_signer_uses_configured_account() {
        assert_eq!(
            account_for_signer("own", Some("test-account")),
            Ok("test-account".to_string())
        );
    }

    #[test]
    fn own_signer_without_account_fails() {
        assert_eq!(
            account_for_signer("own", None),
            Err(SignerError::UnconfiguredOwnAccount)
        );
        assert_eq!(
            account_for_signer("own", Some("")),
            Err(SignerError::UnconfiguredOwnAccount)
        );
    }

    #[test]
    fn other_shapes_are_rejected() {
        for signer in ["a-totally-different-key", "authn:", "authn", "AUTHN:x", " own", ""] {
            assert!(
                matches!(
                    account_for_signer(signer, Some("acct")),
                    Err(SignerError::InvalidShape(_))
                ),
                "{signer}"
            );
        }
    }
}
