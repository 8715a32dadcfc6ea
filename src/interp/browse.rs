//! Listing commands: `ls` and the recursive `tree`.

use futures::future::BoxFuture;
use log::warn;

use crate::api::{RemoteEntry, Storage};
use crate::error::Result;
use crate::interp::Reply;
use crate::paths;
use crate::session::Session;

/// Recursion bound for `tree`. The remote folder graph is assumed to be
/// tree-shaped; the bound keeps a cycle or pathological nesting from
/// walking forever.
const MAX_TREE_DEPTH: usize = 64;

const EMPTY_FOLDER_TEXT: &str = "📁 Folder is empty.";

fn render_line(name_or_path: &str, entry: &RemoteEntry) -> String {
    if entry.is_folder {
        format!("📂 {name_or_path}")
    } else {
        format!("📄 {name_or_path} ({} bytes)", entry.size)
    }
}

/// List the direct children of the cwd, one line per entry.
pub(crate) async fn ls(
    session: &Session,
    storage: &dyn Storage,
    user_id: i64,
) -> Result<Reply> {
    let entries = storage.list(user_id, &session.cwd).await?;
    if entries.is_empty() {
        return Ok(Reply::Text(EMPTY_FOLDER_TEXT.to_string()));
    }

    let lines: Vec<String> = entries
        .iter()
        .map(|entry| render_line(&entry.name, entry))
        .collect();
    Ok(Reply::Text(lines.join("\n")))
}

/// Depth-first recursive listing from the cwd, one line per entry with
/// its full path.
pub(crate) async fn tree(
    session: &Session,
    storage: &dyn Storage,
    user_id: i64,
) -> Result<Reply> {
    let mut lines = Vec::new();
    walk(storage, user_id, session.cwd.clone(), 0, &mut lines).await?;

    if lines.is_empty() {
        return Ok(Reply::Text(EMPTY_FOLDER_TEXT.to_string()));
    }
    Ok(Reply::Text(lines.join("\n")))
}

fn walk<'a>(
    storage: &'a dyn Storage,
    user_id: i64,
    folder: String,
    depth: usize,
    lines: &'a mut Vec<String>,
) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        let entries = storage.list(user_id, &folder).await?;
        for entry in entries {
            let path = paths::join(&folder, &entry.name);
            lines.push(render_line(&path, &entry));
            if entry.is_folder {
                if depth + 1 >= MAX_TREE_DEPTH {
                    warn!("tree walk cut off at depth {MAX_TREE_DEPTH} under {path}");
                    continue;
                }
                walk(storage, user_id, path, depth + 1, lines).await?;
            }
        }
        Ok(())
    })
}
