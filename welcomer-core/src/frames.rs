// ABOUTME: Background frame discovery and per-frame compositing
// ABOUTME: Resizes frames to the canvas, pastes the circular avatar, draws the caption

use crate::error::WelcomerError;
use crate::text;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use rusttype::Font;
use std::path::{Path, PathBuf};

const FRAME_EXTENSIONS: &[&str] = &["gif", "png", "jpg", "jpeg", "webp", "bmp"];

pub struct FrameCompositor {
    canvas_width: u32,
    canvas_height: u32,
    avatar_lift: i32,
    text_drop: i32,
    font_size: f32,
}

impl FrameCompositor {
    pub fn new(
        canvas_width: u32,
        canvas_height: u32,
        avatar_lift: i32,
        text_drop: i32,
        font_size: f32,
    ) -> Self {
        Self {
            canvas_width,
            canvas_height,
            avatar_lift,
            text_drop,
            font_size,
        }
    }

    /// Enumerate frame sources in `dir`, sorted by file name. The sort
    /// fixes discovery order, which the output animation must preserve.
    pub fn discover_frames(&self, dir: &Path) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("failed to read frame directory {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_frame_source(path))
            .collect();
        paths.sort();
        paths
    }

    /// Composite the avatar and caption onto every frame under
    /// `frames_dir`, in discovery order. An empty directory yields an
    /// empty sequence with a warning; a frame that fails to decode is
    /// logged and skipped.
    pub fn compose(
        &self,
        frames_dir: &Path,
        avatar: Option<&RgbaImage>,
        caption: &str,
        font: Option<&Font<'_>>,
    ) -> Vec<RgbaImage> {
        let sources = self.discover_frames(frames_dir);
        if sources.is_empty() {
            log::warn!("no background frames found in {}", frames_dir.display());
            return Vec::new();
        }

        let mut frames = Vec::with_capacity(sources.len());
        for path in &sources {
            match self.compose_frame(path, avatar, caption, font) {
                Ok(frame) => frames.push(frame),
                Err(e) => log::error!("skipping frame: {}", e),
            }
        }
        frames
    }

    fn compose_frame(
        &self,
        path: &Path,
        avatar: Option<&RgbaImage>,
        caption: &str,
        font: Option<&Font<'_>>,
    ) -> Result<RgbaImage, WelcomerError> {
        let decoded = image::ImageReader::open(path)
            .map_err(|e| WelcomerError::FrameLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
            .decode()
            .map_err(|e| WelcomerError::FrameLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut frame = decoded
            .resize_exact(self.canvas_width, self.canvas_height, FilterType::Lanczos3)
            .to_rgba8();

        let centre_x = self.canvas_width as i64 / 2;
        let centre_y = self.canvas_height as i64 / 2;

        if let Some(avatar) = avatar {
            let x = centre_x - avatar.width() as i64 / 2;
            let y = centre_y - avatar.height() as i64 / 2 - self.avatar_lift as i64;
            imageops::overlay(&mut frame, avatar, x, y);
        }

        if let Some(font) = font {
            text::draw_centered_text(
                &mut frame,
                caption,
                font,
                self.font_size,
                (centre_x as i32, centre_y as i32 + self.text_drop),
            );
        }

        Ok(frame)
    }
}

fn is_frame_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            FRAME_EXTENSIONS.iter().any(|known| *known == ext)
        })
        .unwrap_or(false)
}
