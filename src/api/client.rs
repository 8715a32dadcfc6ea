//! HTTP implementation of the [`Storage`] seam.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{Form, Part};
use serde_json::json;

use crate::api::types::{ActionResponse, ListResponse, RemoteEntry, UploadResponse};
use crate::api::{Storage, TransferOp};
use crate::error::Result;
use crate::http::HttpClient;

/// Client for the remote storage service's HTTP API.
#[derive(Debug, Clone)]
pub struct StorageClient {
    http: HttpClient,
    base_url: String,
}

impl StorageClient {
    /// Create a client for the service at `base_url` (no trailing slash).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl Storage for StorageClient {
    async fn list(&self, user_id: i64, folder: &str) -> Result<Vec<RemoteEntry>> {
        let user_id = user_id.to_string();
        let body = self
            .http
            .get(
                &self.endpoint("list"),
                &[("userId", user_id.as_str()), ("folder", folder)],
            )
            .await?;
        let response: ListResponse = serde_json::from_str(&body)?;
        debug!(
            "list folder={} entries={}",
            folder,
            response.files.len()
        );
        Ok(response.files)
    }

    async fn mkdir(&self, user_id: i64, folder: &str, name: &str) -> Result<ActionResponse> {
        let body = self
            .http
            .post_json(
                &self.endpoint("mkdir"),
                &json!({ "userId": user_id, "folder": folder, "name": name }),
            )
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn transfer(
        &self,
        user_id: i64,
        op: TransferOp,
        source: &str,
        destination: &str,
    ) -> Result<ActionResponse> {
        debug!("{} {} -> {}", op.endpoint(), source, destination);
        let body = self
            .http
            .post_json(
                &self.endpoint(op.endpoint()),
                &json!({
                    "userId": user_id,
                    "source": source,
                    "destination": destination,
                }),
            )
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn upload(
        &self,
        user_id: i64,
        folder: &str,
        filename: &str,
        local: &Path,
    ) -> Result<UploadResponse> {
        let bytes = tokio::fs::read(local).await?;
        debug!(
            "upload folder={} filename={} bytes={}",
            folder,
            filename,
            bytes.len()
        );

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(filename.to_string()))
            .text("filename", filename.to_string())
            .text("description", String::new())
            .text("userId", user_id.to_string())
            .text("folder", folder.to_string());

        let body = self
            .http
            .post_multipart(&self.endpoint("upload-book"), form)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn download_url(&self, handle: &str) -> String {
        self.endpoint(&format!("download/{handle}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = StorageClient::new("http://localhost:8080/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.download_url("h1"), "http://localhost:8080/download/h1");
    }
}
