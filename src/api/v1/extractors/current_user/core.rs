use std::{convert::Infallible, sync::Arc};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::{User, context};

/// Identity of an authenticated request.
///
/// Using it on a route the authenticator skips (or an optional route with no
/// credential) is a wiring mistake and answers 500, not 401.
pub struct CurrentUser(pub Arc<User>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(context::current_user()?))
    }
}

/// Identity if one was established, for routes under an `optional` pattern.
pub struct MaybeUser(pub Option<Arc<User>>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(context::current_user().ok()))
    }
}
