//! Avatar image reference and upload checks
//!
//! The image itself is opaque to the game: usually a data URI produced by the
//! browser. We only enforce the upload contract.

use serde::{Deserialize, Serialize};

use super::AvatarError;
use crate::consts::MAX_AVATAR_BYTES;

/// Opaque reference to the player's avatar image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvatarRef(String);

impl AvatarRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Validate an upload and wrap the reference it was encoded to
    pub fn from_upload(
        content_type: &str,
        size: usize,
        reference: impl Into<String>,
    ) -> Result<Self, AvatarError> {
        validate_avatar_upload(content_type, size)?;
        Ok(Self::new(reference))
    }
}

/// Accept only `image/*` payloads up to 5 MiB
pub fn validate_avatar_upload(content_type: &str, size: usize) -> Result<(), AvatarError> {
    if !content_type.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(AvatarError::NotAnImage(content_type.to_string()));
    }
    if size > MAX_AVATAR_BYTES {
        return Err(AvatarError::TooLarge {
            size,
            max: MAX_AVATAR_BYTES,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_images() {
        assert!(validate_avatar_upload("image/png", 1024).is_ok());
        assert!(validate_avatar_upload("IMAGE/JPEG", MAX_AVATAR_BYTES).is_ok());
    }

    #[test]
    fn test_rejects_non_images() {
        assert!(matches!(
            validate_avatar_upload("application/pdf", 10),
            Err(AvatarError::NotAnImage(_))
        ));
    }

    #[test]
    fn test_rejects_oversized() {
        assert!(matches!(
            validate_avatar_upload("image/gif", MAX_AVATAR_BYTES + 1),
            Err(AvatarError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_from_upload() {
        let avatar = AvatarRef::from_upload("image/png", 3, "data:image/png;base64,AAA").unwrap();
        assert_eq!(avatar.as_str(), "data:image/png;base64,AAA");
    }
}
