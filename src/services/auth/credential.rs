/*
 * Responsibility
 * - Extract the Credential from an `Authorization: Token token="<base64>"` header
 * - Keep absent / malformed / well-formed apart in the return type
 * - No signature checks here (that is the SignerResolver's job)
 */
use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use serde_json::{Map, Value};
use thiserror::Error;

const FRAME_PREFIX: &[u8] = b"Token token=\"";

// Standard alphabet; tokens minted by older clients sometimes drop the padding.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("token json is {0}, expected an object")]
    NotAnObject(&'static str),
}

/// Decoded bearer credential.
///
/// The credential is the whole signed JSON object. Its `data` member is the
/// payload that identifies the caller; the remaining members (`timestamp`,
/// `key`, `signature`) belong to the signing engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    fields: Map<String, Value>,
}

impl Credential {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// The `data` member: a bare login string or an object with `login`.
    pub fn payload(&self) -> Option<&Value> {
        self.fields.get("data")
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Decode an `Authorization` header value.
///
/// Works on raw header bytes: a framed value carrying non-ASCII bytes is
/// malformed, not absent.
///
/// - `Ok(None)`: no header, or the value is not `Token token="..."` framed
/// - `Err(_)`: framed, but the inner value is not base64 of a JSON object
/// - `Ok(Some(_))`: a structurally valid (not yet verified) credential
pub fn decode_authorization(header: Option<&[u8]>) -> Result<Option<Credential>, CredentialError> {
    let Some(encoded) = header.and_then(framed_token) else {
        return Ok(None);
    };

    let raw = TOKEN_ENGINE.decode(encoded)?;
    match serde_json::from_slice::<Value>(&raw)? {
        Value::Object(fields) => Ok(Some(Credential::new(fields))),
        other => Err(CredentialError::NotAnObject(json_kind(&other))),
    }
}

// Greedy: the token runs up to the last quote on the line.
fn framed_token(header: &[u8]) -> Option<&[u8]> {
    let rest = header.strip_prefix(FRAME_PREFIX)?;
    let end = rest.iter().rposition(|&b| b == b'"')?;
    Some(&rest[..end])
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
