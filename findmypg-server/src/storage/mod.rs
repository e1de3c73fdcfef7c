//! Image Storage
//!
//! Uploaded pictures (PG photos, room photos, profile avatars) are handed
//! to an [`ImageStore`], which returns the public URL kept in the database.
//! Two backends exist: files on local disk, and the Cloudinary CDN.

pub mod cloudinary;
pub mod local;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, ImageStoreKind};

pub use cloudinary::CloudinaryImageStore;
pub use local::LocalImageStore;

/// Upload destinations, one per kind of picture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFolder {
    PgImages,
    RoomImages,
    Owners,
    Users,
}

impl ImageFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFolder::PgImages => "pgImages",
            ImageFolder::RoomImages => "roomImages",
            ImageFolder::Owners => "owners",
            ImageFolder::Users => "users",
        }
    }

    /// Resize applied by the CDN on upload
    pub fn transformation(&self) -> &'static str {
        match self {
            ImageFolder::PgImages | ImageFolder::RoomImages => "c_limit,w_1000",
            ImageFolder::Owners | ImageFolder::Users => "c_limit,h_500,w_500",
        }
    }
}

/// An image file received in a multipart request
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Only image files are allowed!")]
    NotAnImage,

    #[error("Image '{name}' exceeds the {limit} byte upload limit")]
    TooLarge { name: String, limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Image service rejected the request: {0}")]
    Rejected(String),
}

impl StorageError {
    /// Errors caused by what the client sent rather than by the store
    pub fn is_client_error(&self) -> bool {
        matches!(self, StorageError::NotAnImage | StorageError::TooLarge { .. })
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// A place uploaded images are written to and removed from
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the image and return its public URL
    async fn store(&self, folder: ImageFolder, image: &UploadedImage) -> Result<String>;

    /// Remove a previously stored image by the URL `store` returned
    async fn remove(&self, url: &str) -> Result<()>;

    /// Backend name, for logs
    fn name(&self) -> &'static str;
}

const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif"];

/// Accept jpeg/jpg/png/gif files up to `max_bytes`
///
/// The extension must match, and so must the declared content type when
/// the client sent one.
pub fn validate_image(image: &UploadedImage, max_bytes: usize) -> Result<()> {
    let extension = std::path::Path::new(&image.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let extension_ok = extension
        .as_deref()
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e));

    let content_type_ok = match image.content_type.as_deref() {
        Some(ct) => {
            let ct = ct.to_ascii_lowercase();
            IMAGE_EXTENSIONS
                .iter()
                .any(|e| ct == format!("image/{}", e))
        }
        None => true,
    };

    if !extension_ok || !content_type_ok {
        return Err(StorageError::NotAnImage);
    }

    if image.bytes.len() > max_bytes {
        return Err(StorageError::TooLarge {
            name: image.file_name.clone(),
            limit: max_bytes,
        });
    }

    Ok(())
}

/// Build the store selected by the configuration
pub fn build_store(config: &Config) -> anyhow::Result<Arc<dyn ImageStore>> {
    match config.image_store {
        ImageStoreKind::Local => Ok(Arc::new(LocalImageStore::new(
            config.upload_dir.clone(),
            &config.public_base_url,
        ))),
        ImageStoreKind::Cloudinary => {
            let credentials = config
                .cloudinary
                .clone()
                .ok_or_else(|| anyhow::anyhow!("Cloudinary credentials are not configured"))?;
            Ok(Arc::new(CloudinaryImageStore::new(credentials)?))
        }
    }
}

/// Store every image, or none
///
/// When one upload fails the images stored before it are removed again.
pub async fn store_all(
    store: &dyn ImageStore,
    folder: ImageFolder,
    images: &[UploadedImage],
) -> Result<Vec<String>> {
    let mut urls = Vec::with_capacity(images.len());

    for image in images {
        match store.store(folder, image).await {
            Ok(url) => urls.push(url),
            Err(e) => {
                tracing::error!(
                    "Failed to store '{}' in {}: {}",
                    image.file_name,
                    store.name(),
                    e
                );
                discard(store, &urls).await;
                return Err(e);
            }
        }
    }

    Ok(urls)
}

/// Best-effort removal; returns how many URLs were removed and how many failed
pub async fn discard(store: &dyn ImageStore, urls: &[String]) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    for url in urls {
        match store.remove(url).await {
            Ok(()) => removed += 1,
            Err(e) => {
                tracing::warn!("Failed to remove image {} from {}: {}", url, store.name(), e);
                failed += 1;
            }
        }
    }

    (removed, failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str, content_type: Option<&str>, len: usize) -> UploadedImage {
        UploadedImage {
            file_name: name.to_string(),
            content_type: content_type.map(str::to_string),
            bytes: vec![0u8; len],
        }
    }

    #[test]
    fn test_validate_accepts_images() {
        assert!(validate_image(&image("room.JPG", Some("image/jpeg"), 10), 100).is_ok());
        assert!(validate_image(&image("front.png", None, 10), 100).is_ok());
        assert!(validate_image(&image("tour.gif", Some("image/gif"), 10), 100).is_ok());
    }

    #[test]
    fn test_validate_rejects_other_files() {
        let err = validate_image(&image("notes.txt", Some("text/plain"), 10), 100).unwrap_err();
        assert!(matches!(err, StorageError::NotAnImage));
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Only image files are allowed!");

        // Extension alone is not enough
        let err = validate_image(&image("evil.png", Some("application/pdf"), 10), 100).unwrap_err();
        assert!(matches!(err, StorageError::NotAnImage));

        let err = validate_image(&image("noext", None, 10), 100).unwrap_err();
        assert!(matches!(err, StorageError::NotAnImage));
    }

    #[test]
    fn test_validate_rejects_large_files() {
        let err = validate_image(&image("big.jpg", None, 101), 100).unwrap_err();
        assert!(matches!(err, StorageError::TooLarge { limit: 100, .. }));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_folder_names() {
        assert_eq!(ImageFolder::PgImages.as_str(), "pgImages");
        assert_eq!(ImageFolder::Users.transformation(), "c_limit,h_500,w_500");
    }

    #[tokio::test]
    async fn test_store_all_and_discard() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path().to_path_buf(), "http://localhost:5000");

        let urls = store_all(
            &store,
            ImageFolder::PgImages,
            &[image("a.jpg", None, 3), image("b.png", None, 4)],
        )
        .await
        .unwrap();
        assert_eq!(urls.len(), 2);

        let (removed, failed) = discard(&store, &urls).await;
        assert_eq!((removed, failed), (2, 0));

        let (removed, failed) = discard(&store, &urls).await;
        assert_eq!((removed, failed), (0, 2));
    }
}
