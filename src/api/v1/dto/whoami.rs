/*
 * Responsibility
 * - Response DTOs for /whoami and /role
 */
use std::net::IpAddr;

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum WhoAmIResponse {
    Anonymous { anonymous: bool },
    Authenticated(IdentityResponse),
}

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub account: String,
    pub login: String,
    pub role_id: String,
    pub attributes: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privilege: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_ip: Option<IpAddr>,
    pub audit_roles: Vec<String>,
    pub audit_resources: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub role_id: String,
}
