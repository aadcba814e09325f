/*
 * Responsibility
 * - GET /api/v1/whoami: echo the identity the authenticator established
 * - GET /api/v1/role: role id of the caller (identity required)
 */
use axum::Json;

use crate::{
    api::v1::{
        dto::whoami::{IdentityResponse, RoleResponse, WhoAmIResponse},
        extractors::{CurrentUser, MaybeUser},
    },
    error::AppError,
};

pub async fn whoami(MaybeUser(user): MaybeUser) -> Result<Json<WhoAmIResponse>, AppError> {
    let Some(user) = user else {
        return Ok(Json(WhoAmIResponse::Anonymous { anonymous: true }));
    };

    Ok(Json(WhoAmIResponse::Authenticated(IdentityResponse {
        account: user.account().to_string(),
        login: user.login()?.to_string(),
        role_id: user.role_id()?.to_string(),
        attributes: user.attributes()?.clone(),
        privilege: user.requested_privilege().map(str::to_string),
        remote_ip: user.remote_ip(),
        audit_roles: user.audit_roles().to_vec(),
        audit_resources: user.audit_resources().to_vec(),
    })))
}

pub async fn role(CurrentUser(user): CurrentUser) -> Result<Json<RoleResponse>, AppError> {
    Ok(Json(RoleResponse {
        role_id: user.role_id()?.to_string(),
    }))
}
