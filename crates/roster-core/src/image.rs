use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::ImageError;
use crate::models::ImageAttachment;

/// MIME type guessed from the file extension, as a browser file picker would report it.
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Read a file and turn it into an attachment with a renderable preview.
///
/// Type and size are not checked here; validation does that once the result is
/// placed in a draft.
pub async fn decode_file(path: &Path) -> Result<ImageAttachment, ImageError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|source| ImageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(ImageError::NotAFile(path.to_path_buf()));
    }

    let bytes = tokio::fs::read(path).await.map_err(|source| ImageError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mime_type = mime_from_path(path);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    tracing::debug!(file = %file_name, size = bytes.len(), mime = mime_type, "image decoded");

    Ok(ImageAttachment {
        file_name,
        mime_type: mime_type.to_string(),
        size_bytes: bytes.len() as u64,
        data_url: data_url(mime_type, &bytes),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_from_path(Path::new("a.PNG")), "image/png");
        assert_eq!(mime_from_path(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("a.pdf")), "application/pdf");
        assert_eq!(mime_from_path(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn data_url_encodes_payload() {
        assert_eq!(data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[tokio::test]
    async fn decode_reads_file() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

        let image = decode_file(file.path()).await.unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.size_bytes, 4);
        assert!(image.data_url.starts_with("data:image/png;base64,"));
        assert!(image.file_name.ends_with(".png"));
    }

    #[tokio::test]
    async fn decode_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode_file(&dir.path().join("missing.png")).await.unwrap_err();
        assert!(matches!(err, ImageError::Read { .. }));
    }

    #[tokio::test]
    async fn decode_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode_file(dir.path()).await.unwrap_err();
        assert!(matches!(err, ImageError::NotAFile(_)));
    }
}
