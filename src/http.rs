//! HTTP client wrapper shared by the storage and transport layers.

use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::Client;

use crate::error::{BotError, Result};

/// HTTP client with a uniform per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client whose requests all time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BotError::Request)?;
        Ok(Self { client })
    }

    /// GET with query parameters, returning the response body.
    pub async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let response = self.client.get(url).query(query).send().await?;
        Self::into_text(response).await
    }

    /// POST a JSON body, returning the response body.
    pub async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<String> {
        let response = self.client.post(url).json(body).send().await?;
        Self::into_text(response).await
    }

    /// POST a multipart form, returning the response body.
    pub async fn post_multipart(&self, url: &str, form: Form) -> Result<String> {
        let response = self.client.post(url).multipart(form).send().await?;
        Self::into_text(response).await
    }

    /// GET returning the raw response for streaming consumers.
    pub async fn get_stream(&self, url: &str) -> Result<reqwest::Response> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(BotError::Http(response.status().as_u16()));
        }
        Ok(response)
    }

    async fn into_text(response: reqwest::Response) -> Result<String> {
        if !response.status().is_success() {
            return Err(BotError::Http(response.status().as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new(Duration::from_secs(5));
        assert!(client.is_ok());
    }
}
