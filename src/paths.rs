//! POSIX-style path normalization for remote folder paths.
//!
//! Every command that takes a path-ish argument (`cd`, `mv`, `cp`, the
//! upload destination) resolves it through [`join`], so `.`/`..` handling
//! and slash cleanup behave identically everywhere.

/// Normalize a path: collapse duplicate slashes, resolve `.` and `..`
/// segments, strip the trailing slash (except root), ensure a leading `/`.
///
/// `..` above the root stays at the root.
pub fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Join an argument onto a base directory and normalize the result.
///
/// Absolute arguments replace the base; relative arguments (including
/// `..`) are resolved against it.
pub fn join(base: &str, arg: &str) -> String {
    if arg.starts_with('/') {
        normalize(arg)
    } else {
        normalize(&format!("{}/{}", base, arg))
    }
}

/// Parent directory of a normalized path. The root's parent is the root.
pub fn parent(path: &str) -> String {
    join(path, "..")
}
