use axum::{body::Bytes, extract::Multipart};
use eyre::eyre;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use chronicle_core::model;

use crate::http_error::{ApiResult, HttpError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct TimelineEvent {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: String,
    pub image_url: Option<String>,
}

impl From<model::TimelineEvent> for TimelineEvent {
    fn from(value: model::TimelineEvent) -> Self {
        TimelineEvent {
            id: value.id.0,
            title: value.title,
            description: value.description,
            date: value.date,
            image_url: value.image_url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// File name as sent by the client
    pub file_name: Option<String>,
    pub data: Bytes,
}

/// multipart/form-data body for creating a timeline event
#[derive(Debug, Clone, ToSchema)]
pub struct CreateEventForm {
    pub title: String,
    pub description: String,
    pub date: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<UploadedImage>,
}

impl CreateEventForm {
    /// Reads all fields of the form. Unknown fields are skipped, and for repeated
    /// fields the first occurrence wins.
    pub async fn from_multipart(mut multipart: Multipart) -> ApiResult<CreateEventForm> {
        let mut title: Option<String> = None;
        let mut description: Option<String> = None;
        let mut date: Option<String> = None;
        let mut image: Option<UploadedImage> = None;
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("title") => {
                    let text = field.text().await?;
                    title.get_or_insert(text);
                }
                Some("description") => {
                    let text = field.text().await?;
                    description.get_or_insert(text);
                }
                Some("date") => {
                    let text = field.text().await?;
                    date.get_or_insert(text);
                }
                Some("image") => {
                    let file_name = field.file_name().map(str::to_owned);
                    let data = field.bytes().await?;
                    image.get_or_insert(UploadedImage { file_name, data });
                }
                _ => {
                    tracing::debug!(field = ?name, "ignoring unknown form field");
                }
            }
        }
        Ok(CreateEventForm {
            title: required_field(title, "title")?,
            description: required_field(description, "description")?,
            date: required_field(date, "date")?,
            image,
        })
    }
}

fn required_field(value: Option<String>, name: &str) -> ApiResult<String> {
    value.ok_or_else(|| HttpError::bad_request(eyre!("missing form field `{}`", name)))
}
