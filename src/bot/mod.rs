//! Event dispatch: one serialized worker per user.
//!
//! The [`Dispatcher`] owns the map from user id to worker. Each worker
//! task owns that user's [`Session`] and drains a bounded queue, so
//! events for one user are handled strictly in arrival order and never
//! interleave; different users run concurrently.

pub mod telegram;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, warn};
use tokio::sync::mpsc;

use crate::api::Storage;
use crate::error::Result;
use crate::interp::{self, transfer, Reply};
use crate::session::Session;

pub use telegram::TelegramTransport;

/// Seam to the messaging provider.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a plain text reply.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Send a document the provider fetches from `url`.
    async fn send_document(&self, chat_id: i64, url: &str) -> Result<()>;

    /// Stream the payload behind `file_id` into the local file at `dest`.
    async fn fetch_document(&self, file_id: &str, dest: &Path) -> Result<()>;
}

/// One inbound event, keyed by the sender's chat id at dispatch time.
#[derive(Debug, Clone)]
pub enum Event {
    /// A text line to interpret as a command.
    Text(String),
    /// A binary payload (the second step of the upload flow).
    Document { file_id: String, file_name: String },
}

/// Per-user queue depth; dispatch awaits when a user's queue is full.
const WORKER_QUEUE_DEPTH: usize = 32;

/// Session manager and event router.
pub struct Dispatcher {
    storage: Arc<dyn Storage>,
    transport: Arc<dyn Transport>,
    workers: HashMap<i64, mpsc::Sender<Event>>,
}

impl Dispatcher {
    /// Create a dispatcher over the two external seams.
    pub fn new(storage: Arc<dyn Storage>, transport: Arc<dyn Transport>) -> Self {
        Self {
            storage,
            transport,
            workers: HashMap::new(),
        }
    }

    /// Route one event to its user's worker, spawning the worker (and its
    /// fresh session) on first contact.
    pub async fn dispatch(&mut self, user_id: i64, event: Event) {
        let sender = match self.workers.get(&user_id) {
            Some(sender) => sender.clone(),
            None => {
                let sender = self.spawn_worker(user_id);
                self.workers.insert(user_id, sender.clone());
                sender
            }
        };

        if let Err(mpsc::error::SendError(event)) = sender.send(event).await {
            // The worker is gone; its session state is lost, start over.
            warn!("worker for user {user_id} stopped, starting a fresh session");
            let sender = self.spawn_worker(user_id);
            let _ = sender.send(event).await;
            self.workers.insert(user_id, sender);
        }
    }

    fn spawn_worker(&self, user_id: i64) -> mpsc::Sender<Event> {
        let (tx, rx) = mpsc::channel(WORKER_QUEUE_DEPTH);
        let storage = self.storage.clone();
        let transport = self.transport.clone();
        tokio::spawn(run_worker(user_id, rx, storage, transport));
        tx
    }
}

async fn run_worker(
    user_id: i64,
    mut rx: mpsc::Receiver<Event>,
    storage: Arc<dyn Storage>,
    transport: Arc<dyn Transport>,
) {
    debug!("session created for user {user_id}");
    let mut session = Session::new();

    while let Some(event) = rx.recv().await {
        let reply = match event {
            Event::Text(line) => {
                interp::handle_line(&mut session, storage.as_ref(), user_id, &line).await
            }
            Event::Document { file_id, file_name } => {
                transfer::handle_document(
                    &mut session,
                    storage.as_ref(),
                    transport.as_ref(),
                    user_id,
                    &file_id,
                    &file_name,
                )
                .await
            }
        };

        let Some(reply) = reply else { continue };
        let delivery = match &reply {
            Reply::Text(text) => transport.send_text(user_id, text).await,
            Reply::Document(url) => transport.send_document(user_id, url).await,
        };
        if let Err(e) = delivery {
            error!("failed to deliver reply to user {user_id}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RemoteEntry;
    use crate::testing::{MockStorage, MockTransport};
    use std::time::Duration;

    async fn wait_for_texts(transport: &MockTransport, count: usize) -> Vec<(i64, String)> {
        for _ in 0..100 {
            let texts = transport.sent_texts();
            if texts.len() >= count {
                return texts;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for {count} replies");
    }

    #[tokio::test]
    async fn test_events_for_one_user_run_in_order() {
        let storage: Arc<MockStorage> =
            Arc::new(MockStorage::new().with_folder("/", vec![RemoteEntry::folder("docs")]));
        let transport = Arc::new(MockTransport::new(b""));
        let mut dispatcher = Dispatcher::new(storage, transport.clone());

        dispatcher.dispatch(1, Event::Text("cd docs".to_string())).await;
        dispatcher.dispatch(1, Event::Text("pwd".to_string())).await;

        let texts = wait_for_texts(&transport, 2).await;
        assert_eq!(texts[0], (1, "📂 Changed directory: /docs".to_string()));
        assert_eq!(texts[1], (1, "📍 /docs".to_string()));
    }

    #[tokio::test]
    async fn test_sessions_are_per_user() {
        let storage: Arc<MockStorage> =
            Arc::new(MockStorage::new().with_folder("/", vec![RemoteEntry::folder("docs")]));
        let transport = Arc::new(MockTransport::new(b""));
        let mut dispatcher = Dispatcher::new(storage, transport.clone());

        dispatcher.dispatch(1, Event::Text("cd docs".to_string())).await;
        dispatcher.dispatch(2, Event::Text("pwd".to_string())).await;

        let texts = wait_for_texts(&transport, 2).await;
        let user2_reply = texts.iter().find(|(id, _)| *id == 2).unwrap();
        assert_eq!(user2_reply.1, "📍 /");
    }

    #[tokio::test]
    async fn test_download_reply_is_delivered_as_document() {
        let storage: Arc<MockStorage> = Arc::new(
            MockStorage::new().with_folder("/", vec![RemoteEntry::file("a.pdf", 9, "h7")]),
        );
        let transport = Arc::new(MockTransport::new(b""));
        let mut dispatcher = Dispatcher::new(storage, transport.clone());

        dispatcher.dispatch(1, Event::Text("download a.pdf".to_string())).await;

        for _ in 0..100 {
            if !transport.sent_documents().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(
            transport.sent_documents(),
            vec![(1, "mock://download/h7".to_string())]
        );
    }

    #[tokio::test]
    async fn test_unsolicited_document_produces_no_reply() {
        let storage: Arc<MockStorage> = Arc::new(MockStorage::new());
        let transport = Arc::new(MockTransport::new(b"bytes"));
        let mut dispatcher = Dispatcher::new(storage.clone(), transport.clone());

        dispatcher
            .dispatch(
                1,
                Event::Document {
                    file_id: "f1".to_string(),
                    file_name: "a.txt".to_string(),
                },
            )
            .await;
        dispatcher.dispatch(1, Event::Text("pwd".to_string())).await;

        // The pwd reply proves the document event was already handled.
        let texts = wait_for_texts(&transport, 1).await;
        assert_eq!(texts, vec![(1, "📍 /".to_string())]);
        assert!(storage.uploads().is_empty());
    }
}
