//! Saving user supplied images.
//!
//! Only the extension of the client's file name is looked at. The stored file
//! gets a fresh random name, so neither collisions nor path components from
//! the client can affect where it ends up.

use eyre::Result;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::storage::UploadStorage;

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Path prefix stored files are served under
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

/// Lowercased extension of `file_name` if it is one of [`ALLOWED_EXTENSIONS`].
pub fn allowed_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&ext.as_str())
        .then_some(ext)
}

pub fn unique_file_name(ext: &str) -> String {
    format!("{}.{}", Uuid::new_v4().simple(), ext)
}

pub fn upload_url(file_name: &str) -> String {
    format!("{}/{}", UPLOAD_URL_PREFIX, file_name)
}

/// Stores `data` if `original_name` has an acceptable extension and returns the
/// URL it can be fetched from. Missing or rejected files are not an error, the
/// caller just doesn't get a URL.
#[instrument(skip(storage, data), fields(len = data.len()), level = "debug")]
pub async fn save_image(
    storage: &UploadStorage,
    original_name: Option<&str>,
    data: &[u8],
) -> Result<Option<String>> {
    let Some(ext) = original_name.and_then(allowed_extension) else {
        debug!("no acceptable image in upload");
        return Ok(None);
    };
    let file_name = unique_file_name(&ext);
    storage.write(&file_name, data).await?;
    debug!(%file_name, "stored uploaded image");
    Ok(Some(upload_url(&file_name)))
}
