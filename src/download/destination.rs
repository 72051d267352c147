//! Destination path resolution for downloads.

use std::path::{Component, Path, PathBuf};

use tracing::warn;
use url::Url;

/// Name used when the engine suggests an empty filename.
pub const FALLBACK_FILENAME: &str = "download.bin";

/// Resolves a download path that does not exist yet.
///
/// Tries `dir/name`, then `dir/name.1`, `dir/name.2`, and so on. The probe is
/// unbounded. The name is joined verbatim: separators or `..` segments in an
/// engine-suggested name are not rewritten, only reported with a warning. An
/// empty name is replaced by [`FALLBACK_FILENAME`].
#[must_use]
pub fn resolve_destination(suggested_name: &str, target_dir: &Path) -> PathBuf {
    resolve_destination_with(suggested_name, target_dir, |_| false)
}

/// Like [`resolve_destination`], but also skips candidates for which
/// `is_taken` returns true (paths reserved by downloads still in flight).
#[must_use]
pub fn resolve_destination_with(
    suggested_name: &str,
    target_dir: &Path,
    is_taken: impl Fn(&Path) -> bool,
) -> PathBuf {
    let name = if suggested_name.is_empty() {
        warn!(
            dir = %target_dir.display(),
            fallback = FALLBACK_FILENAME,
            "Empty download name, using fallback"
        );
        FALLBACK_FILENAME
    } else {
        if !is_plain_file_name(suggested_name) {
            warn!(
                name = suggested_name,
                dir = %target_dir.display(),
                "Suggested download name is not a plain file name; joining verbatim"
            );
        }
        suggested_name
    };
    let is_free = |path: &Path| !path.exists() && !is_taken(path);

    let base_path = target_dir.join(name);
    if is_free(&base_path) {
        return base_path;
    }

    let mut suffix: u64 = 1;
    loop {
        let candidate = target_dir.join(format!("{name}.{suffix}"));
        if is_free(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Renders the `file://` URI handed to the engine for a destination.
#[must_use]
pub fn destination_uri(path: &Path) -> String {
    Url::from_file_path(path)
        .map(String::from)
        .unwrap_or_else(|()| format!("file://{}", path.display()))
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}
