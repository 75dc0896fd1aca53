use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to write report '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WriteError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Write the finished report to `dst` as UTF-8, creating or replacing it.
///
/// Uses write-to-temp-then-rename so `dst` is never left half-written:
/// either the previous file survives or the full new report replaces it.
/// Missing parent directories are created.
pub fn write_report(dst: &Path, html: &str) -> Result<(), WriteError> {
    if let Some(parent) = dst.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| WriteError::io(parent, e))?;
    }

    // Timestamp suffix avoids a leftover temp file; create_new fails rather
    // than following or truncating an existing path
    use std::time::{SystemTime, UNIX_EPOCH};
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = dst.with_extension(format!("tmp.{:016x}", suffix));

    let mut temp_file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(|e| WriteError::io(&temp_path, e))?;

    let result = temp_file
        .write_all(html.as_bytes())
        .and_then(|_| temp_file.sync_all());
    drop(temp_file);

    if let Err(e) = result {
        let _ = std::fs::remove_file(&temp_path);
        return Err(WriteError::io(&temp_path, e));
    }

    // On Windows, rename fails if destination exists, so remove it first
    #[cfg(windows)]
    if dst.exists() {
        if let Err(e) = std::fs::remove_file(dst) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(WriteError::io(dst, e));
        }
    }

    if let Err(e) = std::fs::rename(&temp_path, dst) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(WriteError::io(dst, e));
    }

    tracing::debug!(path = %dst.display(), bytes = html.len(), "Report written");
    Ok(())
}
