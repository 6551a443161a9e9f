//! Résumé upload — turns an uploaded file into résumé text.
//!
//! Plain text is decoded as UTF-8. PDFs go through `pdf-extract`, which is
//! CPU-bound and runs inside `tokio::task::spawn_blocking`.

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

const PDF_MAGIC: &[u8] = b"%PDF-";
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "text"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("uploaded file is empty")]
    Empty,

    #[error("uploaded text is not valid UTF-8")]
    NotUtf8,

    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("text extraction task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Text,
    Pdf,
}

/// Extracts résumé text from an uploaded file.
pub async fn extract_text(
    file_name: Option<&str>,
    content_type: Option<&str>,
    data: Bytes,
) -> Result<String, UploadError> {
    if data.is_empty() {
        return Err(UploadError::Empty);
    }

    let kind = detect_kind(file_name, content_type, &data)?;
    debug!("Extracting {kind:?} upload ({} bytes)", data.len());

    let text = match kind {
        FileKind::Text => String::from_utf8(data.to_vec()).map_err(|_| UploadError::NotUtf8)?,
        FileKind::Pdf => tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
            .await
            .map_err(|e| {
                // pdf-extract panics on some malformed documents.
                if e.is_panic() {
                    UploadError::Pdf("malformed document".to_string())
                } else {
                    UploadError::Task(e.to_string())
                }
            })?
            .map_err(|e| UploadError::Pdf(e.to_string()))?,
    };

    let text = normalize(&text);
    if text.is_empty() {
        return Err(UploadError::Empty);
    }
    Ok(text)
}

fn detect_kind(
    file_name: Option<&str>,
    content_type: Option<&str>,
    data: &[u8],
) -> Result<FileKind, UploadError> {
    if data.starts_with(PDF_MAGIC) {
        return Ok(FileKind::Pdf);
    }

    let content_type = content_type.map(|ct| ct.to_ascii_lowercase());
    match content_type.as_deref() {
        Some("application/pdf") => return Ok(FileKind::Pdf),
        Some(ct) if ct.starts_with("text/") => return Ok(FileKind::Text),
        _ => {}
    }

    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => Ok(FileKind::Pdf),
        Some(ext) if TEXT_EXTENSIONS.contains(&ext) => Ok(FileKind::Text),
        // Browsers send application/octet-stream for unknown types; sniff instead.
        _ if std::str::from_utf8(data).is_ok() => Ok(FileKind::Text),
        _ => Err(UploadError::Unsupported(
            content_type
                .or(extension)
                .unwrap_or_else(|| "unknown".to_string()),
        )),
    }
}

/// Normalizes line endings and trims trailing whitespace on every line.
fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_text_upload() {
        let text = extract_text(
            Some("resume.txt"),
            Some("text/plain"),
            Bytes::from_static(b"Jane Doe  \r\nEngineer\r\n"),
        )
        .await
        .unwrap();
        assert_eq!(text, "Jane Doe\nEngineer");
    }

    #[tokio::test]
    async fn test_empty_upload_rejected() {
        let err = extract_text(Some("resume.txt"), None, Bytes::new()).await.unwrap_err();
        assert!(matches!(err, UploadError::Empty));
    }

    #[tokio::test]
    async fn test_whitespace_only_upload_rejected() {
        let err = extract_text(None, Some("text/plain"), Bytes::from_static(b" \n\t\n"))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Empty));
    }

    #[tokio::test]
    async fn test_invalid_utf8_text_rejected() {
        let err = extract_text(Some("resume.txt"), Some("text/plain"), Bytes::from_static(&[0xff, 0xfe, 0x00]))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::NotUtf8));
    }

    #[tokio::test]
    async fn test_truncated_pdf_reports_pdf_error() {
        let err = extract_text(Some("resume.pdf"), Some("application/pdf"), Bytes::from_static(b"%PDF-1.7\n"))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Pdf(_)));
    }

    #[test]
    fn test_detect_kind_by_magic_bytes() {
        let kind = detect_kind(Some("resume.bin"), Some("application/octet-stream"), b"%PDF-1.4").unwrap();
        assert_eq!(kind, FileKind::Pdf);
    }

    #[test]
    fn test_detect_kind_sniffs_octet_stream_text() {
        let kind = detect_kind(None, Some("application/octet-stream"), b"Jane Doe").unwrap();
        assert_eq!(kind, FileKind::Text);
    }

    #[test]
    fn test_detect_kind_rejects_binary() {
        let err = detect_kind(Some("photo.png"), Some("image/png"), &[0x89, 0x50, 0x4e, 0x47, 0xff]).unwrap_err();
        assert!(matches!(err, UploadError::Unsupported(ref t) if t == "image/png"));
    }
}
