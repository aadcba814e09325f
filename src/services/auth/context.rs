//! Per-request identity slot.
//!
//! The slot is task-local: a request only ever sees the identity bound by
//! its own `scope`, and the binding is released when the scoped future
//! finishes, errors, panics or is dropped.
use std::{future::Future, sync::Arc};

use thiserror::Error;

use crate::services::auth::user::User;

tokio::task_local! {
    static CURRENT_USER: Option<Arc<User>>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("No identity for current request")]
    NoIdentity,
}

/// Run `fut` with `user` as the request identity (or explicitly none).
pub async fn scope<F>(user: Option<User>, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT_USER.scope(user.map(Arc::new), fut).await
}

pub fn has_identity() -> bool {
    CURRENT_USER
        .try_with(|user| user.is_some())
        .unwrap_or(false)
}

/// Identity of the current request.
///
/// Calling this outside an authenticated request is a programming error,
/// reported as `ContextError::NoIdentity`.
pub fn current_user() -> Result<Arc<User>, ContextError> {
    CURRENT_USER
        .try_with(|user| user.clone())
        .ok()
        .flatten()
        .ok_or(ContextError::NoIdentity)
}
