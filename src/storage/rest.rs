use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Request, Response, Url};

use crate::common::{Message, MessageDraft};
use crate::config::{ConfigError, STORE_URL_VAR, StoreConfig};

use super::{MessageStore, StoreError};

/// PostgREST-backed message table (the hosted Supabase REST API).
pub struct RestStore {
    client: Client,
    table_url: Url,
    anon_key: String,
}

impl RestStore {
    pub fn new(config: &StoreConfig, table: &str) -> Result<Self, ConfigError> {
        Self::with_client(Client::new(), config, table)
    }

    pub fn with_client(
        client: Client,
        config: &StoreConfig,
        table: &str,
    ) -> Result<Self, ConfigError> {
        let mut base = config.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let table_url = base
            .join(&format!("rest/v1/{table}"))
            .map_err(|err| ConfigError::InvalidUrl {
                var: STORE_URL_VAR,
                reason: err.to_string(),
            })?;

        Ok(Self {
            client,
            table_url,
            anon_key: config.anon_key.clone(),
        })
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    /// `SELECT * FROM <table> ORDER BY created_at DESC`
    pub fn list_request(&self) -> reqwest::Result<Request> {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");

        self.client
            .get(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header(ACCEPT, "application/json")
            .build()
    }

    /// `INSERT INTO <table> (lat, lng, message, display_name) VALUES (...)`
    pub fn create_request(&self, draft: &MessageDraft) -> reqwest::Result<Request> {
        self.client
            .post(self.table_url.clone())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .json(draft)
            .build()
    }
}

async fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status { status, body })
}

#[async_trait]
impl MessageStore for RestStore {
    async fn list_messages(&self) -> Result<Vec<Message>, StoreError> {
        let response = self.client.execute(self.list_request()?).await?;
        let body = ensure_success(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn create_message(&self, draft: &MessageDraft) -> Result<(), StoreError> {
        let response = self.client.execute(self.create_request(draft)?).await?;
        ensure_success(response).await?;
        Ok(())
    }
}
