use axum::extract::{Form, FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use postboard_core::{PostInput, UploadedImage};

use crate::error::ApiError;

/// Post fields read from a multipart form, a JSON body, or a urlencoded form.
///
/// Only multipart parts with a filename are image uploads. An `image` sent as
/// a plain value is kept so validation can reject it, but it never replaces a
/// stored image. A request without a body yields an empty input, which then
/// fails validation rather than extraction.
#[derive(Debug, Clone, Default)]
pub struct PostForm(pub PostInput);

#[derive(Debug, Default, Deserialize)]
struct PostFields {
    title: Option<Value>,
    content: Option<Value>,
    image: Option<Value>,
}

/// Scalars become text; `null` is treated as absent.
fn scalar_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// An `image` field that arrived as text rather than as a file part.
fn plain_value(text: String) -> UploadedImage {
    UploadedImage {
        file_name: None,
        content_type: None,
        data: text.into(),
    }
}

impl From<PostFields> for PostInput {
    fn from(fields: PostFields) -> Self {
        PostInput {
            title: scalar_text(fields.title),
            content: scalar_text(fields.content),
            image: scalar_text(fields.image).map(plain_value),
        }
    }
}

impl<S> FromRequest<S> for PostForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            return read_multipart(multipart).await.map(PostForm);
        }

        if content_type.starts_with("application/json") {
            let Json(fields) = Json::<PostFields>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            return Ok(PostForm(fields.into()));
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<PostFields>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            return Ok(PostForm(fields.into()));
        }

        if content_type.is_empty() {
            return Ok(PostForm::default());
        }

        Err(ApiError::bad_request(format!(
            "unsupported content type: {content_type}"
        )))
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<PostInput, ApiError> {
    let mut input = PostInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" | "content" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
                if name == "title" {
                    input.title = Some(text);
                } else {
                    input.content = Some(text);
                }
            }
            "image" if field.file_name().is_some() => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
                input.image = Some(UploadedImage {
                    file_name,
                    content_type,
                    data,
                });
            }
            "image" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
                input.image = Some(plain_value(text));
            }
            // Unknown parts are skipped by the next `next_field` call.
            _ => {}
        }
    }

    Ok(input)
}
