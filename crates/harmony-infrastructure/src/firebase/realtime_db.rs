//! Journal store backed by the Firebase Realtime Database REST API.
//!
//! Path layout: `artifacts/{app_id}/users/{uid}/journal_entries` (pushed
//! records) and `artifacts/{app_id}/users/{uid}/summary` (a single string).

use std::time::Duration;

use async_trait::async_trait;
use harmony_core::config::PersistenceConfig;
use harmony_core::error::{HarmonyError, Result};
use harmony_core::journal::{JournalRecord, JournalStore};
use reqwest::{Client, RequestBuilder};
use tokio::sync::RwLock;

use super::auth::{FirebaseAuth, FirebaseUser};
use super::dto::{JournalEntryDto, PushResponse};

const DB_TIMEOUT: Duration = Duration::from_secs(10);

pub struct FirebaseJournalStore {
    client: Client,
    database_url: String,
    app_id: String,
    user: RwLock<Option<FirebaseUser>>,
}

impl FirebaseJournalStore {
    /// Creates a store with no signed-in user. Writes are dropped until
    /// [`set_user`](Self::set_user) or [`sign_in`](Self::sign_in) succeeds.
    pub fn new(client: Client, database_url: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            client,
            database_url: database_url.into().trim_end_matches('/').to_string(),
            app_id: app_id.into(),
            user: RwLock::new(None),
        }
    }

    /// Builds the store from config and signs in.
    ///
    /// A failed sign-in is logged; the store is still returned and drops
    /// writes.
    pub async fn connect(config: &PersistenceConfig) -> Result<Self> {
        let (Some(api_key), Some(database_url)) = (&config.api_key, &config.database_url) else {
            return Err(HarmonyError::config(
                "persistence needs both api_key and database_url",
            ));
        };

        let client = Client::new();
        let store = Self::new(client.clone(), database_url.clone(), config.app_id.clone());
        let auth = FirebaseAuth::new(client, api_key.clone(), config.custom_token.clone());
        store.sign_in(&auth).await;
        Ok(store)
    }

    pub async fn sign_in(&self, auth: &FirebaseAuth) -> bool {
        match auth.sign_in().await {
            Ok(user) => {
                self.set_user(user).await;
                true
            }
            Err(e) => {
                tracing::error!("[Persistence] Sign-in failed: {}", e);
                false
            }
        }
    }

    pub async fn set_user(&self, user: FirebaseUser) {
        *self.user.write().await = Some(user);
    }

    pub async fn is_authenticated(&self) -> bool {
        self.user.read().await.is_some()
    }

    /// URL of `leaf` under the user's namespace, with the auth token.
    pub fn user_url(&self, user: &FirebaseUser, leaf: &str) -> String {
        format!(
            "{}/artifacts/{}/users/{}/{}.json?auth={}",
            self.database_url, self.app_id, user.uid, leaf, user.id_token
        )
    }

    async fn current_user(&self) -> Option<FirebaseUser> {
        self.user.read().await.clone()
    }

    async fn send(&self, request: RequestBuilder) -> std::result::Result<reqwest::Response, String> {
        let response = request
            .timeout(DB_TIMEOUT)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(format!("HTTP {}: {}", status.as_u16(), body))
        }
    }
}

#[async_trait]
impl JournalStore for FirebaseJournalStore {
    async fn save_entry(&self, record: JournalRecord) -> Result<()> {
        let Some(user) = self.current_user().await else {
            tracing::error!(
                "[Persistence] No user logged in, cannot save {}",
                record.kind()
            );
            return Ok(());
        };

        let url = self.user_url(&user, "journal_entries");
        let request = self.client.post(&url).json(&JournalEntryDto::from(&record));
        match self.send(request).await {
            Ok(response) => {
                let key = response
                    .json::<PushResponse>()
                    .await
                    .map(|push| push.name)
                    .unwrap_or_default();
                tracing::info!("[Persistence] Saved {} successfully ({})", record.kind(), key);
            }
            Err(e) => tracing::error!("[Persistence] Error saving {}: {}", record.kind(), e),
        }
        Ok(())
    }

    async fn fetch_summary(&self) -> Result<Option<String>> {
        let Some(user) = self.current_user().await else {
            return Ok(None);
        };

        let url = self.user_url(&user, "summary");
        let response = match self.send(self.client.get(&url)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("[Persistence] Error fetching summary: {}", e);
                return Ok(None);
            }
        };

        match response.json::<serde_json::Value>().await {
            Ok(value) => Ok(value.as_str().map(str::to_string)),
            Err(e) => {
                tracing::error!("[Persistence] Unreadable summary: {}", e);
                Ok(None)
            }
        }
    }

    async fn save_summary(&self, summary: &str) -> Result<()> {
        let Some(user) = self.current_user().await else {
            return Ok(());
        };

        let url = self.user_url(&user, "summary");
        match self.send(self.client.put(&url).json(&summary)).await {
            Ok(_) => tracing::info!("[Persistence] Memory summary updated"),
            Err(e) => tracing::error!("[Persistence] Error saving summary: {}", e),
        }
        Ok(())
    }
}
