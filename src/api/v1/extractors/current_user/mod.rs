/*!
 * Identity extractors
 *
 * Responsibility:
 * - Hand the identity established by the authenticator to handlers
 * - The identity lives in the per-request context store, not in request extensions
 *
 * Public API:
 * - CurrentUser (identity required; absence is a server fault)
 * - MaybeUser (identity optional)
 */

mod core;

pub use core::{CurrentUser, MaybeUser};
