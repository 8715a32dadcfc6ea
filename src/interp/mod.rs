//! Command interpreter: parses one text line into a command and executes
//! it against the user's session and the storage service.
//!
//! Remote failures never escape to the caller; they are rendered as a
//! generic error reply so the worker handling the user keeps running.

pub mod browse;
pub mod transfer;

use log::warn;

use crate::api::{Storage, TransferOp};
use crate::error::Result;
use crate::paths;
use crate::session::Session;

/// Outbound reply produced by handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain text message.
    Text(String),
    /// A document the transport should deliver from this URL.
    Document(String),
}

/// Static help text, also shown for `/start`.
pub const HELP_TEXT: &str = "\
📂 File Bot Commands

pwd                  show the current folder
ls                   list the current folder
tree                 list everything below the current folder
cd <folder>          enter a folder (cd .. goes up)
mkdir <folder>       create a folder here
upload <filename>    upload a file here, then send the file
download <file>      receive a file from the current folder
mv <source> <dest>   move a file or folder
cp <source> <dest>   copy a file or folder
help                 show this message";

const UNKNOWN_TEXT: &str = "❓ Unknown command. Type help";

/// A usage error: bad or missing arguments, resolved locally without
/// touching the storage service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage(pub &'static str);

/// One parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Pwd,
    Ls,
    Tree,
    Cd { target: String },
    Mkdir { name: String },
    Upload { filename: String },
    Download { filename: String },
    Transfer {
        op: TransferOp,
        source: String,
        destination: String,
    },
    Unknown,
}

impl Command {
    /// Split on whitespace runs; the first token, lowercased, selects the
    /// command. Extra arguments beyond a command's arity are ignored.
    pub fn parse(line: &str) -> std::result::Result<Command, Usage> {
        let mut parts = line.split_whitespace();
        let Some(first) = parts.next() else {
            return Ok(Command::Unknown);
        };
        let args: Vec<&str> = parts.collect();

        match first.to_lowercase().as_str() {
            "help" | "/help" | "/start" => Ok(Command::Help),
            "pwd" => Ok(Command::Pwd),
            "ls" => Ok(Command::Ls),
            "tree" => Ok(Command::Tree),
            "cd" => match args.first() {
                Some(target) => Ok(Command::Cd {
                    target: target.to_string(),
                }),
                None => Err(Usage("❌ Usage: cd <folder>")),
            },
            "mkdir" => match args.first() {
                Some(name) => Ok(Command::Mkdir {
                    name: name.to_string(),
                }),
                None => Err(Usage("❌ Usage: mkdir <folder>")),
            },
            "upload" => match args.first() {
                Some(filename) => Ok(Command::Upload {
                    filename: filename.to_string(),
                }),
                None => Err(Usage("❌ Usage: upload <filename>")),
            },
            "download" => match args.first() {
                Some(filename) => Ok(Command::Download {
                    filename: filename.to_string(),
                }),
                None => Err(Usage("❌ Usage: download <filename>")),
            },
            "mv" => match (args.first(), args.get(1)) {
                (Some(source), Some(dest)) => Ok(Command::Transfer {
                    op: TransferOp::Move,
                    source: source.to_string(),
                    destination: dest.to_string(),
                }),
                _ => Err(Usage("❌ Usage: mv <source> <dest>")),
            },
            "cp" => match (args.first(), args.get(1)) {
                (Some(source), Some(dest)) => Ok(Command::Transfer {
                    op: TransferOp::Copy,
                    source: source.to_string(),
                    destination: dest.to_string(),
                }),
                _ => Err(Usage("❌ Usage: cp <source> <dest>")),
            },
            _ => Ok(Command::Unknown),
        }
    }
}

/// Handle one text line from a user. Returns `None` for blank input.
pub async fn handle_line(
    session: &mut Session,
    storage: &dyn Storage,
    user_id: i64,
    line: &str,
) -> Option<Reply> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let command = match Command::parse(line) {
        Ok(command) => command,
        Err(Usage(text)) => return Some(Reply::Text(text.to_string())),
    };

    Some(match execute(session, storage, user_id, command).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("command failed for user {user_id}: {e}");
            Reply::Text(format!("❌ Error: {e}"))
        }
    })
}

async fn execute(
    session: &mut Session,
    storage: &dyn Storage,
    user_id: i64,
    command: Command,
) -> Result<Reply> {
    match command {
        Command::Help => Ok(Reply::Text(HELP_TEXT.to_string())),
        Command::Pwd => Ok(Reply::Text(format!("📍 {}", session.cwd))),
        Command::Ls => browse::ls(session, storage, user_id).await,
        Command::Tree => browse::tree(session, storage, user_id).await,
        Command::Cd { target } => cd(session, storage, user_id, &target).await,
        Command::Mkdir { name } => {
            let response = storage.mkdir(user_id, &session.cwd, &name).await?;
            Ok(Reply::Text(if response.success {
                format!("✅ Folder created: {name}")
            } else {
                format!("❌ Failed to create folder: {}", response.error_text())
            }))
        }
        Command::Upload { filename } => Ok(transfer::begin_upload(session, &filename)),
        Command::Download { filename } => {
            transfer::download(session, storage, user_id, &filename).await
        }
        Command::Transfer {
            op,
            source,
            destination,
        } => {
            // Both endpoints resolve against the cwd through the same join.
            let source = paths::join(&session.cwd, &source);
            let destination = paths::join(&session.cwd, &destination);
            let response = storage.transfer(user_id, op, &source, &destination).await?;
            let verb = match op {
                TransferOp::Move => "mv",
                TransferOp::Copy => "cp",
            };
            Ok(Reply::Text(if response.success {
                match response.message {
                    Some(message) => format!("✅ {verb} successful: {message}"),
                    None => format!("✅ {verb} successful"),
                }
            } else {
                format!("❌ {verb} failed: {}", response.error_text())
            }))
        }
        Command::Unknown => Ok(Reply::Text(UNKNOWN_TEXT.to_string())),
    }
}

/// `cd ..` walks up without a remote call; any other target must appear
/// as a folder among the children of the current cwd before the change
/// commits.
async fn cd(
    session: &mut Session,
    storage: &dyn Storage,
    user_id: i64,
    target: &str,
) -> Result<Reply> {
    if target == ".." {
        session.cwd = paths::parent(&session.cwd);
        return Ok(Reply::Text(format!("📂 Changed directory: {}", session.cwd)));
    }

    let entries = storage.list(user_id, &session.cwd).await?;
    let exists = entries.iter().any(|e| e.is_folder && e.name == target);
    if !exists {
        return Ok(Reply::Text("❌ Folder not found".to_string()));
    }

    session.cwd = paths::join(&session.cwd, target);
    Ok(Reply::Text(format!("📂 Changed directory: {}", session.cwd)))
}
