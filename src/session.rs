//! Per-user navigation state.
//!
//! One [`Session`] exists per chat id: the current remote working directory
//! plus an optional pending-upload marker. Sessions are created lazily on
//! first contact, live for the process lifetime, and are never persisted.

/// Upload marker set by the `upload` command and consumed by the next
/// document event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    /// Destination folder, captured as the cwd at `upload` time.
    pub folder: String,
    /// Destination filename on the storage service.
    pub name: String,
}

/// Navigation record for one user.
#[derive(Debug, Clone)]
pub struct Session {
    /// Current working directory. Always a normalized absolute path.
    pub cwd: String,
    /// At most one pending upload at a time; a second `upload` command
    /// before the payload arrives replaces the first.
    pub pending_upload: Option<PendingUpload>,
}

impl Session {
    /// Create a session with defaults: cwd at the root, nothing pending.
    pub fn new() -> Self {
        Self {
            cwd: "/".to_string(),
            pending_upload: None,
        }
    }

    /// Mark an upload as pending, replacing any earlier marker.
    pub fn begin_upload(&mut self, name: &str) {
        self.pending_upload = Some(PendingUpload {
            folder: self.cwd.clone(),
            name: name.to_string(),
        });
    }

    /// Consume the pending-upload marker, leaving the session idle.
    pub fn take_pending_upload(&mut self) -> Option<PendingUpload> {
        self.pending_upload.take()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let session = Session::new();
        assert_eq!(session.cwd, "/");
        assert!(session.pending_upload.is_none());
    }

    #[test]
    fn test_begin_upload_captures_cwd() {
        let mut session = Session::new();
        session.cwd = "/docs".to_string();
        session.begin_upload("report.pdf");

        let pending = session.pending_upload.as_ref().unwrap();
        assert_eq!(pending.folder, "/docs");
        assert_eq!(pending.name, "report.pdf");

        // Moving afterwards must not affect the captured destination.
        session.cwd = "/music".to_string();
        assert_eq!(session.pending_upload.as_ref().unwrap().folder, "/docs");
    }

    #[test]
    fn test_second_upload_replaces_first() {
        let mut session = Session::new();
        session.begin_upload("a.txt");
        session.begin_upload("b.txt");
        assert_eq!(session.pending_upload.as_ref().unwrap().name, "b.txt");
    }

    #[test]
    fn test_take_clears_marker() {
        let mut session = Session::new();
        session.begin_upload("a.txt");
        assert!(session.take_pending_upload().is_some());
        assert!(session.pending_upload.is_none());
        assert!(session.take_pending_upload().is_none());
    }
}
