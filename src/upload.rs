//! Image uploads stored under `<public>/assets/images/<resource>/`.

use std::path::{Component, Path, PathBuf};

use axum::extract::Multipart;
use tokio::fs;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

const FIELD: &str = "image";
const PUBLIC_PREFIX: &str = "assets/images";

#[derive(Debug)]
pub struct ImageUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Checks MIME type, size and that the payload starts like the declared format.
    pub fn validate(&self, max_bytes: usize) -> AppResult<&'static str> {
        if self.bytes.is_empty() {
            return Err(AppError::field(FIELD, "The image field is required."));
        }
        if self.bytes.len() > max_bytes {
            return Err(AppError::field(
                FIELD,
                format!(
                    "The image must not be greater than {} kilobytes.",
                    max_bytes / 1024
                ),
            ));
        }
        let ext = extension_for(&self.content_type).ok_or_else(|| {
            AppError::field(
                FIELD,
                "The image must be a file of type: jpeg, png, gif, webp, svg.",
            )
        })?;
        if !signature_matches(ext, &self.bytes) {
            return Err(AppError::field(FIELD, "The image file is corrupt or mislabeled."));
        }
        Ok(ext)
    }
}

pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    }
}

fn signature_matches(ext: &str, bytes: &[u8]) -> bool {
    match ext {
        "jpg" => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
        "png" => bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "gif" => bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a"),
        "webp" => bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP",
        "svg" => String::from_utf8_lossy(&bytes[..bytes.len().min(512)])
            .trim_start()
            .starts_with('<'),
        _ => false,
    }
}

/// Pulls the `image` part out of a multipart body.
pub async fn read_image(mut multipart: Multipart) -> AppResult<ImageUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(err.body_text()))?
    {
        if field.name() != Some(FIELD) {
            continue;
        }
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_default();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?;
        return Ok(ImageUpload {
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    Err(AppError::field(FIELD, "The image field is required."))
}

/// Writes the image under a fresh name and returns its public path (`/assets/images/...`).
///
/// The file is written next to its final location and renamed into place, so a
/// reader never sees a partial image.
pub async fn store_image(
    public_dir: &Path,
    resource: &str,
    upload: &ImageUpload,
    max_bytes: usize,
) -> AppResult<String> {
    let ext = upload.validate(max_bytes)?;
    let dir = public_dir.join(PUBLIC_PREFIX).join(resource);
    fs::create_dir_all(&dir)
        .await
        .map_err(|err| AppError::Internal(err.into()))?;

    let id = Uuid::new_v4();
    let file_name = format!("{id}.{ext}");
    let tmp = dir.join(format!(".{id}.part"));
    let target = dir.join(&file_name);

    fs::write(&tmp, &upload.bytes)
        .await
        .map_err(|err| AppError::Internal(err.into()))?;
    if let Err(err) = fs::rename(&tmp, &target).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(AppError::Internal(err.into()));
    }

    Ok(format!("/{PUBLIC_PREFIX}/{resource}/{file_name}"))
}

/// Best-effort removal of a previously stored image.
pub async fn remove_image(public_dir: &Path, public_path: &str) {
    let Some(path) = resolve_public_path(public_dir, public_path) else {
        tracing::warn!(path = public_path, "refusing to remove image outside upload dir");
        return;
    };
    match fs::remove_file(&path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "image removed"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => tracing::warn!(error = %err, path = %path.display(), "image removal failed"),
    }
}

fn resolve_public_path(public_dir: &Path, public_path: &str) -> Option<PathBuf> {
    let relative = Path::new(public_path.trim_start_matches('/'));
    if !relative.starts_with(PUBLIC_PREFIX) {
        return None;
    }
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(public_dir.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn upload(content_type: &str, bytes: &[u8]) -> ImageUpload {
        ImageUpload {
            content_type: content_type.into(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn accepts_known_image_types() {
        assert_eq!(upload("image/png", PNG).validate(1024).unwrap(), "png");
        assert_eq!(
            upload("image/jpeg", &[0xFF, 0xD8, 0xFF, 0xE0]).validate(1024).unwrap(),
            "jpg"
        );
        assert_eq!(
            upload("image/svg+xml", b"  <svg xmlns='x'/>").validate(1024).unwrap(),
            "svg"
        );
    }

    #[test]
    fn rejects_wrong_type_size_and_signature() {
        assert!(upload("application/pdf", b"%PDF").validate(1024).is_err());
        assert!(upload("image/png", PNG).validate(4).is_err());
        assert!(upload("image/png", b"GIF89a....").validate(1024).is_err());
        assert!(upload("image/png", b"").validate(1024).is_err());
    }

    #[test]
    fn public_paths_cannot_escape_upload_dir() {
        let root = Path::new("/srv/public");
        assert_eq!(
            resolve_public_path(root, "/assets/images/brands/a.png"),
            Some(PathBuf::from("/srv/public/assets/images/brands/a.png"))
        );
        assert_eq!(resolve_public_path(root, "/assets/images/../../etc/passwd"), None);
        assert_eq!(resolve_public_path(root, "/etc/passwd"), None);
    }

    #[tokio::test]
    async fn stores_then_removes_image() {
        let root = std::env::temp_dir().join(format!("wms-upload-{}", Uuid::new_v4()));
        let path = store_image(&root, "brands", &upload("image/png", PNG), 1024)
            .await
            .unwrap();
        assert!(path.starts_with("/assets/images/brands/"));
        assert!(path.ends_with(".png"));

        let on_disk = root.join(path.trim_start_matches('/'));
        assert_eq!(std::fs::read(&on_disk).unwrap(), PNG);

        remove_image(&root, &path).await;
        assert!(!on_disk.exists());
        let _ = std::fs::remove_dir_all(&root);
    }
}
