// ABOUTME: Custom error types for the welcome pipeline with user-friendly messages
// ABOUTME: Distinguishes errors that degrade the artifact from errors that stop a sub-step

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WelcomerError {
    #[error("avatar fetch failed: {0}")]
    AvatarFetch(String),

    #[error("image dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("failed to load font '{path}': {reason}")]
    FontLoad { path: String, reason: String },

    #[error("failed to load frame '{path}': {reason}")]
    FrameLoad { path: String, reason: String },

    #[error("no frames to encode")]
    EmptySequence,

    #[error("GIF encoding failed: {0}")]
    Encode(String),

    #[error("no suitable channel found for the welcome message")]
    ChannelResolution,

    #[error("role {0} not found in the guild role registry")]
    RoleResolution(u64),
}

impl WelcomerError {
    /// Errors that degrade the artifact (skip the element, keep going)
    /// rather than aborting the welcome.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            WelcomerError::AvatarFetch(_)
                | WelcomerError::FontLoad { .. }
                | WelcomerError::FrameLoad { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            WelcomerError::AvatarFetch("HTTP status 404".to_string()).to_string(),
            "avatar fetch failed: HTTP status 404"
        );
        assert_eq!(
            WelcomerError::InvalidDimensions {
                width: 0,
                height: 124
            }
            .to_string(),
            "image dimensions must be non-zero, got 0x124"
        );
        assert_eq!(
            WelcomerError::FontLoad {
                path: "Font/missing.ttf".to_string(),
                reason: "No such file or directory".to_string()
            }
            .to_string(),
            "failed to load font 'Font/missing.ttf': No such file or directory"
        );
        assert_eq!(
            WelcomerError::EmptySequence.to_string(),
            "no frames to encode"
        );
        assert_eq!(
            WelcomerError::RoleResolution(42).to_string(),
            "role 42 not found in the guild role registry"
        );
    }

    #[test]
    fn test_degradable() {
        assert!(WelcomerError::AvatarFetch("timeout".to_string()).is_degradable());
        assert!(
            WelcomerError::FontLoad {
                path: "a.ttf".to_string(),
                reason: "corrupt".to_string()
            }
            .is_degradable()
        );
        assert!(
            WelcomerError::FrameLoad {
                path: "1.gif".to_string(),
                reason: "truncated".to_string()
            }
            .is_degradable()
        );

        assert!(!WelcomerError::EmptySequence.is_degradable());
        assert!(
            !WelcomerError::InvalidDimensions {
                width: 0,
                height: 0
            }
            .is_degradable()
        );
        assert!(!WelcomerError::ChannelResolution.is_degradable());
        assert!(!WelcomerError::RoleResolution(1).is_degradable());
    }
}
