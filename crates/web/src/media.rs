use std::path::{Path, PathBuf};

use utility::text::slugify;
use uuid::Uuid;

pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("image extension must be one of: jpg, jpeg, png")]
    BadExtension,

    #[error("image may not be larger than 1 MiB")]
    TooLarge,

    #[error("upload is missing a file name")]
    MissingFileName,

    #[error("could not store image: {0}")]
    Io(#[from] std::io::Error),
}

/// Checks name and size of an upload and returns the normalized extension.
pub fn validate_image(file_name: &str, len: usize) -> Result<String, MediaError> {
    if file_name.trim().is_empty() {
        return Err(MediaError::MissingFileName);
    }
    let extension = Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or(MediaError::BadExtension)?;
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(MediaError::BadExtension);
    }
    if len > MAX_IMAGE_BYTES {
        return Err(MediaError::TooLarge);
    }
    Ok(extension)
}

/// Filesystem-backed media storage. Stored paths are relative to the root
/// and served under `/media/`.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validates and writes an upload, returning the relative path to
    /// persist on the owning record. The file name is derived from the
    /// owner's display name plus a random suffix, so uploads never collide.
    pub async fn save(
        &self,
        subdir: &str,
        display_name: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, MediaError> {
        let extension = validate_image(file_name, bytes.len())?;
        let relative = format!(
            "uploads/{}/{}-{}.{}",
            subdir,
            slugify(display_name),
            Uuid::new_v4(),
            extension
        );

        let path = self.root.join(&relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        Ok(relative)
    }

    /// Removes a previously stored file. Called by the delete handlers of
    /// the owning records; the result is theirs to act on.
    pub async fn delete(&self, relative: &str) -> std::io::Result<()> {
        tokio::fs::remove_file(self.root.join(relative)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_extensions_case_insensitively() {
        assert_eq!(validate_image("photo.jpg", 10).unwrap(), "jpg");
        assert_eq!(validate_image("photo.JPEG", 10).unwrap(), "jpeg");
        assert_eq!(validate_image("photo.PNG", 10).unwrap(), "png");
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(matches!(
            validate_image("photo.gif", 10),
            Err(MediaError::BadExtension)
        ));
        assert!(matches!(
            validate_image("photo", 10),
            Err(MediaError::BadExtension)
        ));
        assert!(matches!(
            validate_image("", 10),
            Err(MediaError::MissingFileName)
        ));
    }

    #[test]
    fn rejects_files_over_one_mebibyte() {
        assert!(validate_image("photo.png", MAX_IMAGE_BYTES).is_ok());
        assert!(matches!(
            validate_image("photo.png", MAX_IMAGE_BYTES + 1),
            Err(MediaError::TooLarge)
        ));
    }

    #[tokio::test]
    async fn save_and_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());

        let relative = store
            .save("crews", "Anna Smith", "portrait.png", b"not-really-a-png")
            .await
            .unwrap();
        assert!(relative.starts_with("uploads/crews/anna-smith-"));
        assert!(relative.ends_with(".png"));
        assert_eq!(
            tokio::fs::read(dir.path().join(&relative)).await.unwrap(),
            b"not-really-a-png"
        );

        store.delete(&relative).await.unwrap();
        assert!(!dir.path().join(&relative).exists());
    }

    #[tokio::test]
    async fn oversized_upload_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());
        let big = vec![0_u8; MAX_IMAGE_BYTES + 1];

        let result = store.save("trains", "Express", "photo.jpg", &big).await;
        assert!(matches!(result, Err(MediaError::TooLarge)));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
