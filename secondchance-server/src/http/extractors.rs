//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde_json::{Map, Value};

use super::error::ApiError;
use crate::models::ValidationError;

/// Multipart part carrying the image
pub const FILE_FIELD: &str = "file";

/// File part of a create request
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Body of a create request: item fields plus an optional file.
///
/// Accepts `multipart/form-data` (text parts become string fields, the
/// `file` part becomes the upload) or a plain JSON object.
#[derive(Debug)]
pub struct CreateForm {
    pub fields: Map<String, Value>,
    pub file: Option<UploadedFile>,
}

impl<S> FromRequest<S> for CreateForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| malformed(e.body_text()))?;
            return read_multipart(multipart).await;
        }

        let Json(fields) = Json::<Map<String, Value>>::from_request(req, state)
            .await
            .map_err(|e| malformed(e.body_text()))?;
        Ok(Self { fields, file: None })
    }
}

/// Raw PUT body, decoded by [`PatchBody::into_fields`] once the target item
/// is known to exist.
#[derive(Debug)]
pub struct PatchBody(Bytes);

impl<S> FromRequest<S> for PatchBody
where
    S: Send + Sync,
{
    type Rejection = BytesRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Bytes::from_request(req, state).await.map(Self)
    }
}

impl PatchBody {
    /// Decode the body as a JSON object. An empty body is an empty patch.
    pub fn into_fields(self) -> Result<Map<String, Value>, ApiError> {
        if self.0.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }
        serde_json::from_slice(&self.0).map_err(|e| malformed(e.to_string()))
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<CreateForm, ApiError> {
    let mut fields = Map::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| malformed(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name != FILE_FIELD {
            let text = field.text().await.map_err(|e| malformed(e.body_text()))?;
            fields.insert(name, Value::String(text));
            continue;
        }

        if file.is_some() {
            return Err(ValidationError::Duplicate { field: FILE_FIELD }.into());
        }

        let file_name = field.file_name().unwrap_or_default().to_owned();
        let bytes = field.bytes().await.map_err(|e| malformed(e.body_text()))?;

        // Browsers send an empty, unnamed part when no file was picked
        if file_name.is_empty() && bytes.is_empty() {
            continue;
        }
        file = Some(UploadedFile { file_name, bytes });
    }

    Ok(CreateForm { fields, file })
}

fn malformed(reason: String) -> ApiError {
    ApiError::Validation(ValidationError::Malformed { reason })
}
