/*
 * Responsibility
 * - Public surface of the middleware layer (re-export)
 * - http::apply (access log / request id / limits), auth::apply (authenticator)
 */
pub mod auth;
pub mod http;
