/*
 * Responsibility
 * - Crate root: the binary and the integration tests both build on these modules
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
