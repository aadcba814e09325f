/*
 * Responsibility
 * - Domain services the HTTP layer composes (credential handling, identity, directory boundary)
 * - No axum types here
 */
pub mod auth;
pub mod directory;
