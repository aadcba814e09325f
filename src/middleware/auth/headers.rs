//! Request headers read by the authenticator.
use axum::http::{HeaderMap, HeaderName, header};

pub const PRIVILEGE: HeaderName = HeaderName::from_static("x-conjur-privilege");
pub const AUDIT_ROLES: HeaderName = HeaderName::from_static("conjur-audit-roles");
pub const AUDIT_RESOURCES: HeaderName = HeaderName::from_static("conjur-audit-resources");

/// Raw bytes; opaque (non-ASCII) values must still reach the decoder.
pub fn authorization(headers: &HeaderMap) -> Option<&[u8]> {
    headers.get(header::AUTHORIZATION).map(|v| v.as_bytes())
}

pub fn privilege(headers: &HeaderMap) -> Option<String> {
    string_header(headers, &PRIVILEGE)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

/// Audit ids are form-url-encoded and joined with `&`.
pub fn audit_ids(headers: &HeaderMap, name: &HeaderName) -> Vec<String> {
    let Some(value) = string_header(headers, name) else {
        return Vec::new();
    };
    value
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(unescape)
        .collect()
}

// Whole-segment form decoding: a raw '=' belongs to the id.
fn unescape(segment: &str) -> String {
    let escaped = segment.replace('=', "%3D");
    url::form_urlencoded::parse(escaped.as_bytes())
        .map(|(id, _)| id.into_owned())
        .collect()
}

fn string_header<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn decodes_audit_ids_in_order() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUDIT_ROLES,
            HeaderValue::from_static("acct%3Auser%3Aalice&acct%3Ahost%3Aweb%2F01&&with+space"),
        );
        assert_eq!(
            audit_ids(&headers, &AUDIT_ROLES),
            vec!["acct:user:alice", "acct:host:web/01", "with space"]
        );
        assert!(audit_ids(&headers, &AUDIT_RESOURCES).is_empty());
    }

    #[test]
    fn raw_equals_sign_stays_in_the_id() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUDIT_RESOURCES,
            HeaderValue::from_static("acct:variable:a=b&acct%3Avariable%3Ac%3Dd"),
        );
        assert_eq!(
            audit_ids(&headers, &AUDIT_RESOURCES),
            vec!["acct:variable:a=b", "acct:variable:c=d"]
        );
    }

    #[test]
    fn authorization_keeps_non_ascii_bytes() {
        let mut headers = HeaderMap::new();
        assert_eq!(authorization(&headers), None);
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Token token=\"\xff\xfe\"").unwrap(),
        );
        assert_eq!(
            authorization(&headers),
            Some(&b"Token token=\"\xff\xfe\""[..])
        );
    }

    #[test]
    fn empty_privilege_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(privilege(&headers), None);
        headers.insert(PRIVILEGE, HeaderValue::from_static(""));
        assert_eq!(privilege(&headers), None);
        headers.insert(PRIVILEGE, HeaderValue::from_static("elevate"));
        assert_eq!(privilege(&headers).as_deref(), Some("elevate"));
    }
}
