use anyhow::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;

use textcore::Editor;

const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024;

/// Tracks the file backing the current session and performs the two I/O
/// boundaries: loading content on open, and writing it back on save. Saves
/// go to a fresh temporary file that replaces the target only on success, so
/// a failed save never corrupts the file or the in-memory state. I/O errors
/// propagate; nothing is retried silently.
pub struct FileManager {
    current_path: Option<PathBuf>,
    is_readonly: bool,
}

impl FileManager {
    pub fn new() -> Self {
        Self {
            current_path: None,
            is_readonly: false,
        }
    }

    pub fn current_path(&self) -> Option<&PathBuf> {
        self.current_path.as_ref()
    }

    pub fn has_file(&self) -> bool {
        self.current_path.is_some()
    }

    pub fn is_readonly(&self) -> bool {
        self.is_readonly
    }

    pub async fn open_file(&mut self, path: PathBuf) -> Result<String> {
        if !path.exists() {
            return Err(anyhow::anyhow!("file not found: {}", path.display()));
        }
        if !path.is_file() {
            return Err(anyhow::anyhow!("not a regular file: {}", path.display()));
        }

        match fs::metadata(&path).await {
            Ok(metadata) => {
                self.is_readonly = metadata.permissions().readonly();
                if metadata.len() > LARGE_FILE_THRESHOLD {
                    log::warn!(
                        "Large file ({} bytes): {}",
                        metadata.len(),
                        path.display()
                    );
                }
            }
            Err(e) => {
                log::warn!("Failed to read metadata for {}: {e}", path.display());
                self.is_readonly = false;
            }
        }

        let content = fs::read_to_string(&path).await.map_err(|e| {
            anyhow::anyhow!("failed to read {}: {e}", path.display())
        })?;
        if content.contains('\0') {
            return Err(anyhow::anyhow!(
                "file appears to be binary: {}",
                path.display()
            ));
        }

        self.current_path = Some(path.clone());
        log::info!("Opened {}", path.display());
        Ok(content)
    }

    /// Writes the session back to its current file.
    pub async fn save_file(&self, editor: &mut Editor) -> Result<String> {
        let Some(path) = self.current_path.clone() else {
            return Err(anyhow::anyhow!("no file name"));
        };
        if self.is_readonly {
            return Err(anyhow::anyhow!("file is read-only: {}", path.display()));
        }
        self.write_to(&path, editor).await
    }

    /// Writes the session to `path` and makes it the current file.
    pub async fn save_file_as(&mut self, path: PathBuf, editor: &mut Editor) -> Result<String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    anyhow::anyhow!("failed to create {}: {e}", parent.display())
                })?;
            }
        }

        let written = self.write_to(&path, editor).await?;
        self.current_path = Some(path);
        self.is_readonly = false;
        Ok(written)
    }

    async fn write_to(&self, path: &Path, editor: &mut Editor) -> Result<String> {
        let content = editor.text();

        // Write to a sibling temporary file and rename it over the target,
        // so the old content survives any failure before the final step.
        let mut tmp_name: OsString = path
            .file_name()
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| OsString::from("stilus"));
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        if let Err(e) = fs::write(&tmp_path, content.as_bytes()).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(anyhow::anyhow!(
                "failed to write {}: {e}",
                tmp_path.display()
            ));
        }
        if let Err(e) = fs::rename(&tmp_path, path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(anyhow::anyhow!(
                "failed to replace {}: {e}",
                path.display()
            ));
        }

        editor.mark_saved();
        log::info!("Saved {}", path.display());
        Ok(format!("\"{}\" {}L written", path.display(), editor.line_count()))
    }
}

impl Default for FileManager {
    fn default() -> Self {
        Self::new()
    }
}
