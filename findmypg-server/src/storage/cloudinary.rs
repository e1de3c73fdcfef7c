//! Cloudinary image store
//!
//! Images are sent to the signed upload API and resized on the way in.
//! Removal goes through the destroy API using the public id recovered from
//! the delivery URL.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{ImageFolder, ImageStore, Result, StorageError, UploadedImage};
use crate::config::CloudinaryCredentials;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Everything under this folder in the media library belongs to us
const ROOT_FOLDER: &str = "findmypg";

/// `.../upload/[transformations/]v<version>/<public id>.<ext>`
static PUBLIC_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/v\d+/(.+?)(?:\.[^./]+)?$").expect("valid regex"));

pub struct CloudinaryImageStore {
    credentials: CloudinaryCredentials,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryImageStore {
    pub fn new(credentials: CloudinaryCredentials) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self {
            credentials,
            client,
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{}",
            API_BASE, self.credentials.cloud_name, action
        )
    }

    /// Sign `params`, attach the credentials, and build the form
    fn signed_form(&self, params: Vec<(&'static str, String)>) -> Form {
        let signature = sign(&params, &self.credentials.api_secret);

        params
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value))
            .text("api_key", self.credentials.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
    }

    async fn send<T: for<'de> Deserialize<'de>>(&self, url: String, form: Form) -> Result<T> {
        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => format!("status {}", status),
            };
            return Err(StorageError::Rejected(message));
        }

        Ok(response.json().await?)
    }
}

/// Request signature: parameters sorted by name, joined as `k=v` with `&`,
/// followed by the API secret, hashed with SHA-256.
pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Public id of a delivery URL, e.g. `findmypg/pgImages/abc` for
/// `https://res.cloudinary.com/demo/image/upload/v1712/findmypg/pgImages/abc.jpg`
pub fn public_id_from_url(url: &str) -> Option<String> {
    PUBLIC_ID
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    async fn store(&self, folder: ImageFolder, image: &UploadedImage) -> Result<String> {
        let params = vec![
            ("folder", format!("{}/{}", ROOT_FOLDER, folder.as_str())),
            ("timestamp", timestamp()),
            ("transformation", folder.transformation().to_string()),
        ];

        let mut part = Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
        if let Some(content_type) = &image.content_type {
            part = part.mime_str(content_type)?;
        }

        let form = self.signed_form(params).part("file", part);
        let uploaded: UploadResponse = self.send(self.endpoint("upload"), form).await?;

        tracing::debug!("Uploaded {} to {}", image.file_name, uploaded.secure_url);
        Ok(uploaded.secure_url)
    }

    async fn remove(&self, url: &str) -> Result<()> {
        let public_id = public_id_from_url(url)
            .ok_or_else(|| StorageError::Rejected(format!("'{}' is not a Cloudinary URL", url)))?;

        let params = vec![("public_id", public_id.clone()), ("timestamp", timestamp())];
        let destroyed: DestroyResponse = self
            .send(self.endpoint("destroy"), self.signed_form(params))
            .await?;

        if destroyed.result != "ok" {
            return Err(StorageError::Rejected(format!(
                "destroy {} returned '{}'",
                public_id, destroyed.result
            )));
        }

        tracing::debug!("Destroyed {}", public_id);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "cloudinary"
    }
}
