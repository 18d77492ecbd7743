use anyhow::{Context, Result};
use async_trait::async_trait;
use menuboard_core::{SheetData, SheetSource, SyncError};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SHEET_PATH: &str = "/api/sheet";
pub const DEVICE_PATH: &str = "/api/device";

/// How much of an error body to keep in messages.
const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Registration<'a> {
    device_id: &'a str,
}

/// Direct HTTP client for the sheet API.
#[derive(Debug, Clone)]
pub struct SheetClient {
    http: Client,
    base_url: String,
}

impl SheetClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Publish a snapshot verbatim. The server stores it and fires
    /// `sheet-updated`. Displays never call this; operator tooling does.
    pub async fn publish_sheet(&self, body: &Value) -> Result<String> {
        let url = self.url(SHEET_PATH);

        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .context("Failed to contact sheet API")?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Sheet API returned {}: {}",
                status,
                excerpt(&text)
            ));
        }

        let parsed: ApiMessage =
            serde_json::from_str(&text).context("Sheet API returned no message")?;
        Ok(parsed.message)
    }
}

#[async_trait]
impl SheetSource for SheetClient {
    async fn fetch_sheet(&self) -> Result<SheetData, SyncError> {
        let url = self.url(SHEET_PATH);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        if status == StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound(message_or_status(&text, status)));
        }
        if !status.is_success() {
            return Err(SyncError::Transport(format!(
                "GET {} returned {}: {}",
                url,
                status,
                excerpt(&text)
            )));
        }

        let sheet: SheetData =
            serde_json::from_str(&text).map_err(|e| SyncError::Malformed(e.to_string()))?;
        tracing::debug!(
            devices = sheet.devices.len(),
            items = sheet.menu_items.len(),
            "snapshot fetched"
        );
        Ok(sheet)
    }

    async fn register_device(&self, device_id: &str) -> Result<(), SyncError> {
        let url = self.url(DEVICE_PATH);

        let resp = self
            .http
            .post(&url)
            .json(&Registration { device_id })
            .send()
            .await
            .map_err(|e| SyncError::Registration(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(SyncError::Registration(format!(
                "POST {} returned {}: {}",
                url,
                status,
                excerpt(&text)
            )));
        }

        tracing::info!(%device_id, "device registered");
        Ok(())
    }
}

fn message_or_status(text: &str, status: StatusCode) -> String {
    serde_json::from_str::<ApiMessage>(text)
        .map(|m| m.message)
        .unwrap_or_else(|_| status.to_string())
}

fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_CHARS).collect()
}
