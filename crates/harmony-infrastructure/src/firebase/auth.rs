//! Identity Toolkit sign-in: anonymous, or with a custom token.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::dto::{AuthErrorResponse, AuthResponse, CustomTokenRequest, SignUpRequest};

pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Sign-in request failed: {0}")]
    Transport(String),
    #[error("Sign-in rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Sign-in response carried no user id")]
    MissingUid,
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseUser {
    pub uid: String,
    pub id_token: String,
}

pub struct FirebaseAuth {
    client: Client,
    base_url: String,
    api_key: String,
    custom_token: Option<String>,
}

impl FirebaseAuth {
    pub fn new(client: Client, api_key: impl Into<String>, custom_token: Option<String>) -> Self {
        Self {
            client,
            base_url: IDENTITY_TOOLKIT_URL.to_string(),
            api_key: api_key.into(),
            custom_token,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Signs in with the custom token when one is configured, anonymously
    /// otherwise.
    pub async fn sign_in(&self) -> Result<FirebaseUser, AuthError> {
        let response = match &self.custom_token {
            Some(token) => {
                tracing::debug!("[Auth] Signing in with custom token");
                self.post(
                    "accounts:signInWithCustomToken",
                    &CustomTokenRequest {
                        token,
                        return_secure_token: true,
                    },
                )
                .await?
            }
            None => {
                tracing::debug!("[Auth] Signing in anonymously");
                self.post(
                    "accounts:signUp",
                    &SignUpRequest {
                        return_secure_token: true,
                    },
                )
                .await?
            }
        };

        let uid = match response.local_id {
            Some(uid) => uid,
            None => uid_from_id_token(&response.id_token).ok_or(AuthError::MissingUid)?,
        };
        tracing::info!("[Auth] User authenticated: {}", uid);

        Ok(FirebaseUser {
            uid,
            id_token: response.id_token,
        })
    }

    async fn post<B: serde::Serialize>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<AuthResponse, AuthError> {
        let url = format!("{}/{}?key={}", self.base_url, method, self.api_key);
        let response = self
            .client
            .post(&url)
            .timeout(AUTH_TIMEOUT)
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AuthErrorResponse>(&body)
                .map(|wrapper| wrapper.error.message)
                .unwrap_or(body);
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<AuthResponse>()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))
    }
}

#[derive(Deserialize)]
struct IdTokenClaims {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    sub: Option<String>,
}

/// Reads the uid from an ID token's payload without verifying it.
pub fn uid_from_id_token(id_token: &str) -> Option<String> {
    let payload = id_token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: IdTokenClaims = serde_json::from_slice(&bytes).ok()?;
    claims.user_id.or(claims.sub)
}
