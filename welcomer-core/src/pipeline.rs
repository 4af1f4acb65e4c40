// ABOUTME: Composition root for the welcome pipeline: fetch, mask, composite, encode
// ABOUTME: Tolerates avatar and font failures; identical inputs yield identical bytes

use crate::avatar::AvatarFetcher;
use crate::constants::{geometry, text as text_defaults, timing};
use crate::error::WelcomerError;
use crate::frames::FrameCompositor;
use crate::{encode, mask, text};
use std::path::PathBuf;

/// Per-join inputs, captured once from the join event and never mutated.
#[derive(Debug, Clone)]
pub struct WelcomeContext {
    pub member_name: String,
    pub guild_name: String,
    pub avatar_url: String,
}

/// Fixed pipeline settings. All of these are decided before any
/// compositing starts and do not vary per frame.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub frames_dir: PathBuf,
    pub font_path: PathBuf,
    pub avatar_size: u32,
    pub border_width: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub frame_delay_ms: u32,
    pub font_size: f32,
    pub avatar_lift: i32,
    pub text_drop: i32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            frames_dir: PathBuf::from("ImageFrames"),
            font_path: PathBuf::from(text_defaults::DEFAULT_FONT_PATH),
            avatar_size: geometry::AVATAR_SIZE,
            border_width: geometry::BORDER_WIDTH,
            canvas_width: geometry::CANVAS_WIDTH,
            canvas_height: geometry::CANVAS_HEIGHT,
            frame_delay_ms: timing::FRAME_DELAY_MS,
            font_size: text_defaults::FONT_SIZE,
            avatar_lift: geometry::AVATAR_LIFT,
            text_drop: geometry::TEXT_DROP,
        }
    }
}

/// The encoded animation, held in memory. Each render owns a fresh
/// buffer, so concurrent joins never share storage; dropping the value
/// releases it on every exit path.
#[derive(Debug, Clone)]
pub struct WelcomeArtifact {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

pub struct WelcomeRenderer {
    fetcher: AvatarFetcher,
    compositor: FrameCompositor,
    options: RenderOptions,
}

impl WelcomeRenderer {
    pub fn new(options: RenderOptions) -> Result<Self, WelcomerError> {
        let fetcher = AvatarFetcher::new(options.avatar_size)?;
        let compositor = FrameCompositor::new(
            options.canvas_width,
            options.canvas_height,
            options.avatar_lift,
            options.text_drop,
            options.font_size,
        );
        Ok(Self {
            fetcher,
            compositor,
            options,
        })
    }

    /// Run the full pipeline for one join. Avatar and font failures
    /// degrade the card (no avatar, no text) without aborting; an empty
    /// frame set surfaces as `EmptySequence` so the caller can skip
    /// posting.
    pub async fn render(&self, ctx: &WelcomeContext) -> Result<WelcomeArtifact, WelcomerError> {
        let avatar = match self.fetcher.fetch(&ctx.avatar_url).await {
            Ok(img) => Some(img),
            Err(e) => {
                log::error!("continuing without avatar: {}", e);
                None
            }
        };

        let badge = match avatar {
            Some(img) => Some(mask::circular_avatar(&img, self.options.border_width)?),
            None => None,
        };

        let font = match text::load_font(&self.options.font_path) {
            Ok(font) => Some(font),
            Err(e) => {
                log::error!("continuing without text: {}", e);
                None
            }
        };

        let caption = welcome_caption(&ctx.guild_name, &ctx.member_name);
        let frames = self.compositor.compose(
            &self.options.frames_dir,
            badge.as_ref(),
            &caption,
            font.as_ref(),
        );

        let bytes = encode::encode_gif(&frames, self.options.frame_delay_ms)?;
        log::info!(
            "rendered welcome card for {} ({} frames, {} bytes)",
            ctx.member_name,
            frames.len(),
            bytes.len()
        );

        Ok(WelcomeArtifact {
            bytes,
            file_name: "welcome.gif".to_string(),
        })
    }
}

/// Text drawn onto the card itself.
pub fn welcome_caption(guild_name: &str, member_name: &str) -> String {
    format!("Welcome to {} @{}", guild_name, member_name)
}
