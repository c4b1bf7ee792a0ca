/// Size aggregation — computes the total byte size of a file or directory.
///
/// A single file contributes its own length; a directory contributes the sum
/// of the lengths of every regular file reachable by recursive descent.
/// Traversal is `jwalk`-based with `follow_links(false)`, so a symlinked
/// directory can never produce an infinite walk. Symlinks themselves count
/// as the size the filesystem reports for the link entry.
///
/// # Fault policy
///
/// One unreadable entry never aborts the computation. Any entry that cannot
/// be read or entered (permission denied, deleted mid-walk) is reported to
/// the caller's `on_entry_error` handler, contributes zero bytes, and the
/// walk continues over the rest of the subtree. The handler is a plain
/// callback so the walk can be unit-tested without the scheduler.
use std::path::{Path, PathBuf};
use tracing::warn;

/// Compute the total size in bytes of `path`.
///
/// Returns `None` if `path` does not exist at call time — the caller must
/// not confuse a missing target with a computed size of zero.
///
/// `on_entry_error` is invoked once per skipped entry, in walk order, with
/// the offending sub-path (when known) and a description of the failure.
pub fn compute_size(
    path: &Path,
    on_entry_error: &mut dyn FnMut(Option<PathBuf>, String),
) -> Option<u64> {
    // symlink_metadata rather than metadata: a dangling symlink is still an
    // existing entry with a size, not a missing target.
    let meta = match std::fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(_) => return None,
    };

    if !meta.is_dir() {
        return Some(meta.len());
    }

    Some(walk_dir_size(path, on_entry_error))
}

/// Sum the sizes of all regular files under `root` (which must be a
/// directory), skipping unreadable entries.
fn walk_dir_size(root: &Path, on_entry_error: &mut dyn FnMut(Option<PathBuf>, String)) -> u64 {
    let mut total: u64 = 0;

    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false);

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                // Typically access-denied on a directory, or an entry that
                // vanished between listing and stat.
                let err_path = err.path().map(Path::to_path_buf);
                on_entry_error(err_path, format!("{err}"));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        // Stat outside the walker — this is the expensive syscall.
        let path = entry.path();
        match std::fs::symlink_metadata(&path) {
            Ok(meta) => total = total.saturating_add(meta.len()),
            Err(err) => {
                // The walker yielded the entry but the size query failed,
                // usually a file deleted mid-walk. The design does not
                // anticipate this on a listable file, so it is logged loudly
                // as well as reported, then skipped.
                warn!("unexpected metadata failure on {}: {err}", path.display());
                on_entry_error(Some(path), format!("{err}"));
            }
        }
    }

    total
}
