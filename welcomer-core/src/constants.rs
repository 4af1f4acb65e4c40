// ABOUTME: Centralized constants for the welcome-card pipeline
// ABOUTME: Contains geometry, frame timing, fetch limits, and text defaults

/// Card geometry in pixels
pub mod geometry {
    /// Square edge length the fetched avatar is stretched to
    pub const AVATAR_SIZE: u32 = 124;

    /// Width of the circular border ring around the avatar
    pub const BORDER_WIDTH: u32 = 3;

    /// Output canvas every background frame is resized to
    pub const CANVAS_WIDTH: u32 = 1000;
    pub const CANVAS_HEIGHT: u32 = 430;

    /// Vertical offset of the avatar above frame centre
    pub const AVATAR_LIFT: i32 = 70;

    /// Vertical offset of the welcome text below frame centre
    pub const TEXT_DROP: i32 = 50;
}

/// Frame timing and network deadlines
pub mod timing {
    use std::time::Duration;

    /// Display duration of each frame in the output animation
    pub const FRAME_DELAY_MS: u32 = 53;

    /// Deadline for the avatar HTTP request
    pub const AVATAR_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Avatar download limits
pub mod fetch {
    /// Largest avatar body accepted, declared or streamed
    pub const MAX_AVATAR_BYTES: u64 = 8 * 1024 * 1024;

    /// Redirect cap for the avatar request
    pub const MAX_REDIRECTS: usize = 3;

    pub const USER_AGENT: &str = "welcomer-bot/0.1";
}

/// Welcome text defaults
pub mod text {
    pub const FONT_SIZE: f32 = 40.0;

    /// Font used when the configuration does not name one
    pub const DEFAULT_FONT_PATH: &str = "Font/FreeSerifBoldItalic.ttf";
}
