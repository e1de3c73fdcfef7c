//! Local disk image store
//!
//! Files land in `<root>/<folder>/<millis>_<uuid>_<name>` and are served by
//! the router under `/uploads`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use super::{ImageFolder, ImageStore, Result, StorageError, UploadedImage};

const MAX_NAME_LEN: usize = 100;

pub struct LocalImageStore {
    root: PathBuf,
    base_url: String,
}

impl LocalImageStore {
    pub fn new(root: PathBuf, public_base_url: &str) -> Self {
        Self {
            root,
            base_url: format!("{}/uploads", public_base_url.trim_end_matches('/')),
        }
    }

    /// Map a URL produced by `store` back to the file on disk
    ///
    /// Bare `uploads/<folder>/<file>` paths are accepted as well. Anything
    /// that would leave the upload root is refused.
    fn resolve(&self, url: &str) -> Option<PathBuf> {
        let relative = url
            .strip_prefix(&self.base_url)
            .or_else(|| url.strip_prefix("/uploads"))
            .or_else(|| url.strip_prefix("uploads"))?
            .strip_prefix('/')?;

        let parts: Vec<&str> = relative.split('/').collect();
        if parts.len() != 2 {
            return None;
        }

        let safe = parts
            .iter()
            .all(|p| !p.is_empty() && *p != "." && *p != ".." && !p.contains('\\'));
        if !safe {
            return None;
        }

        Some(self.root.join(parts[0]).join(parts[1]))
    }
}

fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.len() > MAX_NAME_LEN {
        cleaned[cleaned.len() - MAX_NAME_LEN..].to_string()
    } else {
        cleaned
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, folder: ImageFolder, image: &UploadedImage) -> Result<String> {
        let dir = self.root.join(folder.as_str());
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!(
            "{}_{}_{}",
            chrono::Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            sanitize_file_name(&image.file_name)
        );

        tokio::fs::write(dir.join(&file_name), &image.bytes).await?;

        tracing::debug!("Stored {} in {}", file_name, dir.display());

        Ok(format!("{}/{}/{}", self.base_url, folder.as_str(), file_name))
    }

    async fn remove(&self, url: &str) -> Result<()> {
        let path = self
            .resolve(url)
            .ok_or_else(|| StorageError::Rejected(format!("'{}' is not a local upload", url)))?;

        tokio::fs::remove_file(&path).await?;

        tracing::debug!("Removed {}", path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
