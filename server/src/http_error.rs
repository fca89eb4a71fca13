use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use eyre;

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    err: eyre::Report,
}

impl HttpError {
    pub fn new(status: StatusCode, err: eyre::Report) -> Self {
        HttpError { status, err }
    }

    pub fn bad_request(err: eyre::Report) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn not_found(err: eyre::Report) -> Self {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

// Tell axum how to convert `HttpError` into a response.
impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = if self.status.is_server_error() {
            tracing::error!(error = ?self.err, "request failed");
            format!("Server error: {:#}", self.err)
        } else {
            format!("{:#}", self.err)
        };
        (self.status, body).into_response()
    }
}

macro_rules! impl_from {
    ($from:ty) => {
        impl From<$from> for HttpError {
            fn from(err: $from) -> Self {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.into())
            }
        }
    };
}

impl_from!(std::io::Error);
impl_from!(eyre::Report);

impl From<MultipartError> for HttpError {
    fn from(err: MultipartError) -> Self {
        let status = err.status();
        Self::new(
            status,
            eyre::Report::new(err).wrap_err("error reading multipart form"),
        )
    }
}

pub type ApiResult<T> = Result<T, HttpError>;

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.err)
    }
}
