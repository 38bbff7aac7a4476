//! Serialized shapes stored under the session keys.
//!
//! Profiles, the canonical identity and the token are stored as JSON. Older
//! clients wrote the token raw, which is still accepted, and used a
//! differently shaped identity record that is decoded here and converted.

use models::{Identity, Role, UserStatus};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Identity record as written by older clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyUserRecord {
    #[serde(alias = "userId", alias = "user_id")]
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "username", alias = "fullName")]
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub status: Option<UserStatus>,
}

impl From<LegacyUserRecord> for Identity {
    fn from(r: LegacyUserRecord) -> Self {
        Identity {
            user_id: r.id,
            email: r.email,
            name: r.name,
            role: r.role,
            status: r.status.unwrap_or_default(),
        }
    }
}

pub fn encode<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(raw)
}

pub fn decode_legacy_identity(raw: &str) -> Result<Identity, serde_json::Error> {
    decode::<LegacyUserRecord>(raw).map(Identity::from)
}

/// Tokens are written as a JSON string, so any token text survives a reload.
pub fn encode_token(token: &str) -> Result<String, serde_json::Error> {
    encode(&token)
}

/// Decode a stored token. Values that are not a JSON string were written raw
/// by older clients and are taken as is.
///
/// Returns `None` for blank values.
pub fn decode_token(raw: &str) -> Option<String> {
    let token = match serde_json::from_str::<String>(raw) {
        Ok(token) => token,
        Err(_) => raw.trim().to_string(),
    };
    (!token.trim().is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_record_converts() {
        let id = decode_legacy_identity(r#"{"id":3,"email":"a@b.c","username":"Ann","role":"jobseeker"}"#).unwrap();
        assert_eq!(id, Identity::new(3, Role::JobSeeker).with_email("a@b.c").with_name("Ann"));
    }

    #[test]
    fn legacy_record_requires_role() {
        assert!(decode_legacy_identity(r#"{"id":3,"email":"a@b.c"}"#).is_err());
    }

    #[test]
    fn token_forms() {
        assert_eq!(decode_token("tok123").as_deref(), Some("tok123"));
        assert_eq!(decode_token("\"tok123\"").as_deref(), Some("tok123"));
        assert_eq!(decode_token("  "), None);
        assert_eq!(decode_token("\"\""), None);
    }

    #[test]
    fn quoted_token_text_survives_encoding() {
        for token in ["\"abc\"", "eyJhbGciOi.x.y", "a\\b", "\"\""] {
            let stored = encode_token(token).unwrap();
            assert_eq!(decode_token(&stored).as_deref(), Some(token));
        }
    }
}
