/*
 * Responsibility
 * - Authenticator middleware and the pieces it composes
 *   (path policy, request headers, caller IP resolution)
 */
pub mod authenticator;
pub mod headers;
pub mod policy;
pub mod remote_ip;

pub use authenticator::{AuthError, Authenticator, apply};
pub use policy::{AuthMode, PathPolicy};
pub use remote_ip::{RemoteIpResolver, TrustedProxies};
