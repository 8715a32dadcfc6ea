//! Transfer pipeline: the two-step upload flow and download resolution.
//!
//! Upload is a per-session state machine with two states: idle (no
//! pending upload) and awaiting-payload. The `upload` command moves the
//! session to awaiting-payload; the next document event moves it back to
//! idle unconditionally, whatever the outcome. A document event while
//! idle is ignored, which is what blocks unsolicited uploads.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::api::Storage;
use crate::bot::Transport;
use crate::error::Result;
use crate::interp::Reply;
use crate::session::{PendingUpload, Session};

/// Scoped temp-directory relay for one upload.
///
/// The payload is streamed into a fresh directory under the system temp
/// dir; dropping the guard removes the directory on every exit path.
pub struct TempUpload {
    dir: PathBuf,
    path: PathBuf,
}

impl TempUpload {
    /// Create the relay directory and compute the local file path from
    /// the payload's original filename.
    pub async fn create(user_id: i64, file_name: &str) -> Result<Self> {
        let nonce: u64 = rand::random();
        let dir = std::env::temp_dir().join(format!("shelfbot-{user_id}-{nonce:016x}"));
        tokio::fs::create_dir_all(&dir).await?;

        // Only the final component of the client-supplied name is used.
        let local_name = Path::new(file_name)
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "upload.bin".into());

        Ok(Self {
            path: dir.join(local_name),
            dir,
        })
    }

    /// Local path the payload is relayed through.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.dir) {
            warn!("failed to remove temp upload dir {}: {e}", self.dir.display());
        }
    }
}

/// `upload <filename>`: mark the upload as pending and ask for the file.
/// The destination folder is the cwd at this moment, not at payload time.
pub(crate) fn begin_upload(session: &mut Session, filename: &str) -> Reply {
    session.begin_upload(filename);
    Reply::Text("📤 Please send the file now.".to_string())
}

/// `download <file>`: resolve the name to a file handle in the cwd and
/// hand back a document reference; the service streams the bytes itself.
pub(crate) async fn download(
    session: &Session,
    storage: &dyn Storage,
    user_id: i64,
    filename: &str,
) -> Result<Reply> {
    let entries = storage.list(user_id, &session.cwd).await?;
    let Some(entry) = entries.iter().find(|e| !e.is_folder && e.name == filename) else {
        return Ok(Reply::Text("❌ File not found".to_string()));
    };

    match entry.handle.as_deref() {
        Some(handle) => Ok(Reply::Document(storage.download_url(handle))),
        None => Ok(Reply::Text(format!(
            "❌ {filename} is not available for download"
        ))),
    }
}

/// Handle a document event. Returns `None` (no reply, no state change)
/// when no upload is pending.
pub async fn handle_document(
    session: &mut Session,
    storage: &dyn Storage,
    transport: &dyn Transport,
    user_id: i64,
    file_id: &str,
    file_name: &str,
) -> Option<Reply> {
    // Taking the marker up front guarantees it is cleared on every exit
    // path, including unexpected errors below.
    let Some(pending) = session.take_pending_upload() else {
        debug!("ignoring unsolicited document from user {user_id}");
        return None;
    };

    Some(
        match run_upload(storage, transport, user_id, file_id, file_name, &pending).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("upload failed for user {user_id}: {e}");
                Reply::Text(format!("❌ Upload failed: {e}"))
            }
        },
    )
}

async fn run_upload(
    storage: &dyn Storage,
    transport: &dyn Transport,
    user_id: i64,
    file_id: &str,
    file_name: &str,
    pending: &PendingUpload,
) -> Result<Reply> {
    let temp = TempUpload::create(user_id, file_name).await?;

    transport.fetch_document(file_id, temp.path()).await?;
    let response = storage
        .upload(user_id, &pending.folder, &pending.name, temp.path())
        .await?;

    Ok(Reply::Text(if response.success {
        match response.download_url {
            Some(url) => format!("✅ Upload successful!\nDownload URL: {url}"),
            None => "✅ Upload successful!".to_string(),
        }
    } else {
        format!(
            "❌ Upload failed: {}",
            response.error.as_deref().unwrap_or("unknown error")
        )
    }))
}
