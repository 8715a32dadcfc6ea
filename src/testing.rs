//! In-memory mocks for the storage and transport seams, used by unit
//! tests across the crate.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{ActionResponse, RemoteEntry, Storage, TransferOp, UploadResponse};
use crate::bot::Transport;
use crate::error::{BotError, Result};

/// One recorded multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UploadCall {
    pub folder: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Storage mock: a fixed folder map plus call recording.
#[derive(Default)]
pub(crate) struct MockStorage {
    folders: HashMap<String, Vec<RemoteEntry>>,
    action_error: Option<String>,
    upload_error: Option<String>,
    fail_lists: bool,
    list_calls: Mutex<Vec<String>>,
    mkdir_calls: Mutex<Vec<(String, String)>>,
    transfer_calls: Mutex<Vec<(TransferOp, String, String)>>,
    uploads: Mutex<Vec<UploadCall>>,
    download_urls: Mutex<Vec<String>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder(mut self, path: &str, entries: Vec<RemoteEntry>) -> Self {
        self.folders.insert(path.to_string(), entries);
        self
    }

    /// Make mkdir/move/copy report `success: false` with this error.
    pub fn with_action_error(mut self, error: &str) -> Self {
        self.action_error = Some(error.to_string());
        self
    }

    /// Make uploads report `success: false` with this error.
    pub fn with_upload_error(mut self, error: &str) -> Self {
        self.upload_error = Some(error.to_string());
        self
    }

    /// Make every list call fail at the transport level.
    pub fn with_list_failure(mut self) -> Self {
        self.fail_lists = true;
        self
    }

    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn mkdir_calls(&self) -> Vec<(String, String)> {
        self.mkdir_calls.lock().unwrap().clone()
    }

    pub fn transfer_calls(&self) -> Vec<(TransferOp, String, String)> {
        self.transfer_calls.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<UploadCall> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn download_urls_built(&self) -> Vec<String> {
        self.download_urls.lock().unwrap().clone()
    }

    fn action_response(&self) -> ActionResponse {
        match &self.action_error {
            Some(error) => ActionResponse {
                success: false,
                message: None,
                error: Some(error.clone()),
            },
            None => ActionResponse {
                success: true,
                message: None,
                error: None,
            },
        }
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn list(&self, _user_id: i64, folder: &str) -> Result<Vec<RemoteEntry>> {
        if self.fail_lists {
            return Err(BotError::Http(500));
        }
        self.list_calls.lock().unwrap().push(folder.to_string());
        Ok(self.folders.get(folder).cloned().unwrap_or_default())
    }

    async fn mkdir(&self, _user_id: i64, folder: &str, name: &str) -> Result<ActionResponse> {
        self.mkdir_calls
            .lock()
            .unwrap()
            .push((folder.to_string(), name.to_string()));
        Ok(self.action_response())
    }

    async fn transfer(
        &self,
        _user_id: i64,
        op: TransferOp,
        source: &str,
        destination: &str,
    ) -> Result<ActionResponse> {
        self.transfer_calls
            .lock()
            .unwrap()
            .push((op, source.to_string(), destination.to_string()));
        Ok(self.action_response())
    }

    async fn upload(
        &self,
        _user_id: i64,
        folder: &str,
        filename: &str,
        local: &Path,
    ) -> Result<UploadResponse> {
        let bytes = tokio::fs::read(local).await?;
        self.uploads.lock().unwrap().push(UploadCall {
            folder: folder.to_string(),
            filename: filename.to_string(),
            bytes,
        });

        Ok(match &self.upload_error {
            Some(error) => UploadResponse {
                success: false,
                download_url: None,
                error: Some(error.clone()),
            },
            None => UploadResponse {
                success: true,
                download_url: Some("mock://download/uploaded".to_string()),
                error: None,
            },
        })
    }

    fn download_url(&self, handle: &str) -> String {
        let url = format!("mock://download/{handle}");
        self.download_urls.lock().unwrap().push(url.clone());
        url
    }
}

/// Transport mock: fixed payload bytes, recorded outbound messages.
pub(crate) struct MockTransport {
    payload: Vec<u8>,
    fail_fetch: bool,
    sent_texts: Mutex<Vec<(i64, String)>>,
    sent_documents: Mutex<Vec<(i64, String)>>,
}

impl MockTransport {
    pub fn new(payload: &[u8]) -> Self {
        Self {
            payload: payload.to_vec(),
            fail_fetch: false,
            sent_texts: Mutex::new(Vec::new()),
            sent_documents: Mutex::new(Vec::new()),
        }
    }

    /// A transport whose payload fetch always fails.
    pub fn failing() -> Self {
        let mut transport = Self::new(b"");
        transport.fail_fetch = true;
        transport
    }

    pub fn sent_texts(&self) -> Vec<(i64, String)> {
        self.sent_texts.lock().unwrap().clone()
    }

    pub fn sent_documents(&self) -> Vec<(i64, String)> {
        self.sent_documents.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.sent_texts
            .lock()
            .unwrap()
            .push((chat_id, text.to_string()));
        Ok(())
    }

    async fn send_document(&self, chat_id: i64, url: &str) -> Result<()> {
        self.sent_documents
            .lock()
            .unwrap()
            .push((chat_id, url.to_string()));
        Ok(())
    }

    async fn fetch_document(&self, _file_id: &str, dest: &Path) -> Result<()> {
        if self.fail_fetch {
            return Err(BotError::Transport("payload fetch failed".to_string()));
        }
        tokio::fs::write(dest, &self.payload).await?;
        Ok(())
    }
}
