//! Telegram Bot API transport over long polling.
//!
//! Consumes the provider's HTTP API as-is: `getUpdates` for inbound
//! events, `sendMessage`/`sendDocument` for replies, and `getFile` plus
//! the file endpoint to fetch upload payloads.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tokio::io::AsyncWriteExt;

use crate::bot::{Dispatcher, Event, Transport};
use crate::config::Config;
use crate::error::{BotError, Result};
use crate::http::HttpClient;

/// Upper bound for the `getUpdates` long-poll window, seconds.
const MAX_POLL_WINDOW_SECS: u64 = 25;

/// Pause after a failed poll before retrying.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiEnvelope<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Update {
    update_id: i64,
    #[serde(default)]
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct Document {
    file_id: String,
    #[serde(default)]
    file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct File {
    #[serde(default)]
    file_path: Option<String>,
}

/// Map one update to a dispatchable event. Updates that carry neither
/// text nor a document are dropped.
fn event_from_update(update: Update) -> Option<(i64, Event)> {
    let message = update.message?;
    let chat_id = message.chat.id;

    if let Some(document) = message.document {
        let file_name = document.file_name.unwrap_or_else(|| "upload.bin".to_string());
        return Some((
            chat_id,
            Event::Document {
                file_id: document.file_id,
                file_name,
            },
        ));
    }

    message.text.map(|text| (chat_id, Event::Text(text)))
}

/// Telegram transport: long-poll receiver and reply sender.
pub struct TelegramTransport {
    http: HttpClient,
    api_base: String,
    file_base: String,
    poll_window_secs: u64,
}

impl TelegramTransport {
    /// Build the transport from the startup configuration.
    pub fn new(config: &Config) -> Result<Self> {
        // The poll window must close before the HTTP timeout fires.
        let poll_window_secs = config
            .request_timeout
            .as_secs()
            .saturating_sub(5)
            .min(MAX_POLL_WINDOW_SECS);

        Ok(Self {
            http: HttpClient::new(config.request_timeout)?,
            api_base: format!("https://api.telegram.org/bot{}", config.telegram_token),
            file_base: format!("https://api.telegram.org/file/bot{}", config.telegram_token),
            poll_window_secs,
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: serde_json::Value) -> Result<T> {
        let url = format!("{}/{}", self.api_base, method);
        let text = self.http.post_json(&url, &body).await?;
        let envelope: ApiEnvelope<T> = serde_json::from_str(&text)?;

        if !envelope.ok {
            return Err(BotError::Transport(
                envelope
                    .description
                    .unwrap_or_else(|| format!("{method} failed")),
            ));
        }
        envelope.result.ok_or(BotError::InvalidResponse)
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            json!({
                "offset": offset,
                "timeout": self.poll_window_secs,
                "allowed_updates": ["message"],
            }),
        )
        .await
    }

    /// Poll for updates forever, routing each one through the dispatcher.
    pub async fn run(self: std::sync::Arc<Self>, mut dispatcher: Dispatcher) {
        info!("polling for updates");
        let mut offset = 0i64;

        loop {
            let updates = match self.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    warn!("getUpdates failed: {e}");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                let Some((chat_id, event)) = event_from_update(update) else {
                    continue;
                };
                debug!("event from chat {chat_id}");
                dispatcher.dispatch(chat_id, event).await;
            }
        }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call("sendMessage", json!({ "chat_id": chat_id, "text": text }))
            .await?;
        Ok(())
    }

    async fn send_document(&self, chat_id: i64, url: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                "sendDocument",
                json!({ "chat_id": chat_id, "document": url }),
            )
            .await?;
        Ok(())
    }

    async fn fetch_document(&self, file_id: &str, dest: &Path) -> Result<()> {
        let file: File = self.call("getFile", json!({ "file_id": file_id })).await?;
        let file_path = file
            .file_path
            .ok_or_else(|| BotError::Transport("getFile returned no file path".to_string()))?;

        let url = format!("{}/{}", self.file_base, file_path);
        let response = self.http.get_stream(&url).await?;

        let mut out = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            out.write_all(&chunk?).await?;
        }
        out.flush().await?;
        Ok(())
    }
}
