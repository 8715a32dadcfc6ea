//! Remote storage service client and types.

pub mod client;
pub mod types;

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

pub use client::StorageClient;
pub use types::{ActionResponse, ListResponse, RemoteEntry, UploadResponse};

/// Whether a two-argument transfer moves or copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOp {
    Move,
    Copy,
}

impl TransferOp {
    /// Endpoint path segment on the storage service.
    pub fn endpoint(&self) -> &'static str {
        match self {
            TransferOp::Move => "move",
            TransferOp::Copy => "copy",
        }
    }
}

/// Seam to the remote storage service.
///
/// The interpreter and transfer pipeline only speak to this trait; the
/// HTTP implementation is [`StorageClient`], tests use an in-memory mock.
#[async_trait]
pub trait Storage: Send + Sync {
    /// List the direct children of `folder`.
    async fn list(&self, user_id: i64, folder: &str) -> Result<Vec<RemoteEntry>>;

    /// Create folder `name` inside `folder`.
    async fn mkdir(&self, user_id: i64, folder: &str, name: &str) -> Result<ActionResponse>;

    /// Move or copy `source` to `destination` (both absolute paths).
    async fn transfer(
        &self,
        user_id: i64,
        op: TransferOp,
        source: &str,
        destination: &str,
    ) -> Result<ActionResponse>;

    /// Upload the local file at `local` as `filename` inside `folder`.
    async fn upload(
        &self,
        user_id: i64,
        folder: &str,
        filename: &str,
        local: &Path,
    ) -> Result<UploadResponse>;

    /// URL from which the service streams the file behind `handle`.
    fn download_url(&self, handle: &str) -> String;
}
