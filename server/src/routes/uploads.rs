use axum::{
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use axum_extra::body::AsyncReadBody;
use eyre::eyre;

use chronicle_core::storage::StorageReadError;

use crate::{
    app_state::SharedState,
    http_error::{ApiResult, HttpError},
    mime_type::guess_mime_type_path,
};

pub fn router() -> Router<SharedState> {
    Router::new().route("/:file_name", get(get_upload))
}

#[utoipa::path(get, path = "/uploads/{file_name}",
responses(
    (status = 200, body = String, content_type = "application/octet-stream"),
    (status = NOT_FOUND, body = String, description = "No such file")
),
    params(
        ("file_name" = String, Path, description = "Stored file name, as returned in image_url")
    )
)]
#[tracing::instrument(name = "Get uploaded file", skip(app_state), level = "trace")]
pub async fn get_upload(
    Path(file_name): Path<String>,
    State(app_state): State<SharedState>,
) -> ApiResult<Response> {
    let read = match app_state.uploads.open_read_stream(&file_name).await {
        Ok(read) => read,
        Err(StorageReadError::FileNotFound(_)) => {
            return Err(HttpError::not_found(eyre!("no such file")));
        }
        Err(err) => {
            return Err(eyre::Report::new(err)
                .wrap_err("could not open file for reading")
                .into());
        }
    };
    let body = AsyncReadBody::new(read);
    match guess_mime_type_path(camino::Utf8Path::new(&file_name)) {
        Some(content_type) => Ok(([(CONTENT_TYPE, content_type)], body).into_response()),
        None => Ok(body.into_response()),
    }
}
