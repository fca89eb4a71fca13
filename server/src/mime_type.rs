pub fn guess_mime_type(file_ext: &str) -> Option<&'static str> {
    match file_ext {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

pub fn guess_mime_type_path(path: &camino::Utf8Path) -> Option<&'static str> {
    let ext = path.extension()?.to_ascii_lowercase();
    match guess_mime_type(&ext) {
        Some(m) => Some(m),
        None => {
            tracing::warn!(
                "can't guess MIME type for filename '{}'",
                path.file_name().unwrap_or_default()
            );
            None
        }
    }
}
