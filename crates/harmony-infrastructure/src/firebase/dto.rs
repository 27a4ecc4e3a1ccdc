//! Wire shapes for the Realtime Database and Identity Toolkit REST APIs.

use harmony_core::journal::JournalRecord;
use serde::{Deserialize, Serialize};

/// `{".sv": "timestamp"}`: filled in by the database on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerTimestamp {
    #[serde(rename = ".sv")]
    sv: &'static str,
}

impl Default for ServerTimestamp {
    fn default() -> Self {
        Self { sv: "timestamp" }
    }
}

/// A journal record as pushed to `journal_entries`.
#[derive(Debug, Serialize)]
pub struct JournalEntryDto<'a> {
    #[serde(flatten)]
    pub record: &'a JournalRecord,
    pub timestamp: ServerTimestamp,
}

impl<'a> From<&'a JournalRecord> for JournalEntryDto<'a> {
    fn from(record: &'a JournalRecord) -> Self {
        Self {
            record,
            timestamp: ServerTimestamp::default(),
        }
    }
}

/// Response body of a push: the generated child key.
#[derive(Debug, Deserialize)]
pub struct PushResponse {
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignUpRequest {
    pub return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomTokenRequest<'a> {
    pub token: &'a str,
    pub return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponse {
    pub id_token: String,
    /// Present for anonymous sign-up; custom-token sign-in omits it.
    #[serde(default)]
    pub local_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthErrorResponse {
    pub error: AuthErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthErrorDetail {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_carries_type_and_server_timestamp() {
        let record = JournalRecord::user_identity("Ada");
        let value = serde_json::to_value(JournalEntryDto::from(&record)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "user_identity",
                "name": "Ada",
                "timestamp": {".sv": "timestamp"}
            })
        );
    }

    #[test]
    fn test_auth_response_without_local_id() {
        let response: AuthResponse =
            serde_json::from_str(r#"{"idToken":"abc","refreshToken":"r","expiresIn":"3600"}"#)
                .unwrap();
        assert_eq!(response.id_token, "abc");
        assert!(response.local_id.is_none());
    }
}
