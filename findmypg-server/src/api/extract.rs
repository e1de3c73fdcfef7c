//! Request Extraction Helpers
//!
//! Header-carried ids, JSON bodies with client-friendly rejections, and
//! multipart forms mixing text fields with image files.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{
        Multipart, Query,
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
    },
    http::HeaderMap,
};
use findmypg_core::lenient::parse_int;
use serde::de::DeserializeOwned;

use crate::api::error::{ApiError, ApiResult};
use crate::storage::{UploadedImage, validate_image};

/// Integer id from a request header; absent headers are `None`
pub fn header_id(headers: &HeaderMap, name: &str) -> ApiResult<Option<i32>> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };

    let invalid = || ApiError::BadRequest(format!("Invalid {} header", name));
    let raw = value.to_str().map_err(|_| invalid())?;

    parse_int(raw).map_err(|_| invalid())
}

/// Integer id from a request header that must be present
pub fn require_header_id(headers: &HeaderMap, name: &str) -> ApiResult<i32> {
    header_id(headers, name)?
        .ok_or_else(|| ApiError::BadRequest(format!("Missing {} header", name)))
}

/// Unwrap a JSON body, turning extractor rejections into 400s
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!("Rejected JSON body: {}", rejection.body_text());
            Err(ApiError::BadRequest(format!(
                "Invalid request body: {}",
                rejection.body_text()
            )))
        }
    }
}

/// Unwrap query parameters, answering malformed strings with the JSON error shape
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    match query {
        Ok(Query(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!("Rejected query string: {}", rejection.body_text());
            Err(ApiError::BadRequest(format!(
                "Invalid query string: {}",
                rejection.body_text()
            )))
        }
    }
}

/// A fully read multipart form
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: Vec<(String, UploadedImage)>,
}

impl UploadForm {
    /// Read every part; each file must be an acceptable image
    pub async fn read(
        multipart: Result<Multipart, MultipartRejection>,
        max_upload_bytes: usize,
    ) -> ApiResult<Self> {
        let mut multipart = multipart
            .map_err(|e| ApiError::BadRequest(format!("Expected a multipart form: {}", e)))?;

        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid multipart form: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {}", e)))?;

                    // An empty file input still sends a part
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }

                    let image = UploadedImage {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    };
                    validate_image(&image, max_upload_bytes)?;
                    form.files.push((name, image));
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Invalid form field: {}", e)))?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    pub fn fields(&self) -> &HashMap<String, String> {
        &self.fields
    }

    /// Text field, with blank values treated as absent
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Remove and return the files sent as `name` or `name[]`
    pub fn take_files(&mut self, name: &str) -> Vec<UploadedImage> {
        let bracketed = format!("{}[]", name);
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|(field, _)| field == name || *field == bracketed);

        self.files = kept;
        taken.into_iter().map(|(_, image)| image).collect()
    }

    /// Parse a JSON text field; `None` when the field is absent
    pub fn json<T: DeserializeOwned>(&self, name: &str) -> ApiResult<Option<T>> {
        match self.text(name) {
            Some(raw) => serde_json::from_str(raw).map(Some).map_err(|e| {
                tracing::debug!("Invalid JSON in '{}' field: {}", name, e);
                ApiError::BadRequest("Invalid JSON data format".to_string())
            }),
            None => Ok(None),
        }
    }

    /// A JSON array of URLs; anything unparsable is logged and ignored
    pub fn url_list(&self, name: &str) -> Vec<String> {
        let Some(raw) = self.text(name) else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(urls) => urls
                .into_iter()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .collect(),
            Err(e) => {
                tracing::warn!("Ignoring unparsable '{}' field: {}", name, e);
                Vec::new()
            }
        }
    }
}
