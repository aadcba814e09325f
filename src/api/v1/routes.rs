/*
 * Responsibility
 * - v1 URL layout
 * - Which routes need a credential is NOT decided here: the authenticator
 *   wraps the whole app and consults its path policy
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::whoami::{role, whoami};

pub fn routes() -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .route("/role", get(role))
}
