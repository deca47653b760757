//! Saving the generated design to disk

use std::path::{Path, PathBuf};

use blueprint_core::{decode_image, Mode, Session};

use crate::error::ClientError;

/// `{mode}-design-{millis}.png`
pub fn download_file_name(mode: Mode, millis: i64) -> String {
    format!("{}-design-{}.png", mode, millis)
}

/// PNG bytes of the session's last generated image
pub fn download_bytes(session: &Session) -> Result<Vec<u8>, ClientError> {
    let image = session
        .last_generated_image
        .as_deref()
        .ok_or(ClientError::NoImage)?;
    Ok(decode_image(image)?)
}

/// Write the last generated image into `dir` and return the file path
pub async fn save_download(dir: &Path, session: &Session) -> Result<PathBuf, ClientError> {
    let bytes = download_bytes(session)?;
    let path = dir.join(download_file_name(
        session.mode,
        chrono::Utc::now().timestamp_millis(),
    ));

    tokio::fs::write(&path, &bytes).await?;
    log::info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_core::{encode_image, GenerationOutcome};
    use std::time::Instant;

    fn with_image(mode: Mode, image_base64: String) -> Session {
        Session::new(mode).apply(
            &GenerationOutcome::Succeeded { image_base64 },
            Instant::now(),
        )
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            download_file_name(Mode::Logo, 1_700_000_000_123),
            "logo-design-1700000000123.png"
        );
        assert_eq!(download_file_name(Mode::Product, 5), "product-design-5.png");
    }

    #[tokio::test]
    async fn test_save_is_byte_identical() {
        let payload: Vec<u8> = b"\x89PNG\r\n\x1a\n".iter().copied().chain(0..=255u8).collect();
        let session = with_image(Mode::Logo, encode_image(&payload));
        let dir = tempfile::tempdir().unwrap();

        let path = save_download(dir.path(), &session).await.unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("logo-design-"));
        assert!(name.ends_with(".png"));
        assert_eq!(std::fs::read(&path).unwrap(), payload);
    }

    #[tokio::test]
    async fn test_save_without_image() {
        let dir = tempfile::tempdir().unwrap();
        let result = save_download(dir.path(), &Session::new(Mode::Logo)).await;
        assert!(matches!(result, Err(ClientError::NoImage)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_invalid_payload() {
        let session = with_image(Mode::Logo, "not base64!".to_string());
        assert!(matches!(
            download_bytes(&session),
            Err(ClientError::InvalidImage(_))
        ));
    }
}
