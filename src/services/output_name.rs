//! Output file naming.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Build `<dir>/<stem>_<yyyymmdd-HHMMSS>_<n>.png` for the first `n >= 1`
/// that does not exist yet.
pub fn timestamped_output_path(input: &Path, dir: Option<&Path>, now: DateTime<Local>) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("glitch");
    let dir = dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    let timestamp = now.format("%Y%m%d-%H%M%S");

    let mut n = 1u32;
    loop {
        let candidate = dir.join(format!("{stem}_{timestamp}_{n}.png"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}
