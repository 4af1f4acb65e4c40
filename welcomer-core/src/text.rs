// ABOUTME: Font loading and centered text overlay for composite frames
// ABOUTME: Measures glyph bounding boxes and composites coverage as solid white

use crate::error::WelcomerError;
use image::RgbaImage;
use rusttype::{point, Font, Rect, Scale};
use std::path::Path;

pub fn load_font(path: &Path) -> Result<Font<'static>, WelcomerError> {
    let data = std::fs::read(path).map_err(|e| WelcomerError::FontLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    Font::try_from_vec(data).ok_or_else(|| WelcomerError::FontLoad {
        path: path.display().to_string(),
        reason: "not a parsable font file".to_string(),
    })
}

/// Draw `text` in solid white, centered on `center` both horizontally and
/// vertically by measured glyph bounding box. Mutates `img` in place;
/// strings with no visible glyphs are a no-op.
pub fn draw_centered_text(
    img: &mut RgbaImage,
    text: &str,
    font: &Font<'_>,
    size: f32,
    center: (i32, i32),
) {
    let scale = Scale::uniform(size);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<_> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();

    let bounds = glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box())
        .reduce(|acc, bb| Rect {
            min: point(acc.min.x.min(bb.min.x), acc.min.y.min(bb.min.y)),
            max: point(acc.max.x.max(bb.max.x), acc.max.y.max(bb.max.y)),
        });
    let bounds = match bounds {
        Some(bounds) => bounds,
        None => return,
    };

    let (dx, dy) = centered_offset(&bounds, center);

    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x + dx;
                let py = gy as i32 + bb.min.y + dy;
                blend_white(img, px, py, coverage);
            });
        }
    }
}

/// Translation that puts the centre of `bounds` on `center`.
fn centered_offset(bounds: &Rect<i32>, center: (i32, i32)) -> (i32, i32) {
    let width = bounds.max.x - bounds.min.x;
    let height = bounds.max.y - bounds.min.y;
    (
        center.0 - width / 2 - bounds.min.x,
        center.1 - height / 2 - bounds.min.y,
    )
}

fn blend_white(img: &mut RgbaImage, x: i32, y: i32, coverage: f32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= img.width() || y >= img.height() {
        return;
    }
    let alpha = (coverage * 255.0) as u8;
    if alpha == 0 {
        return;
    }

    let sa = alpha as f32 / 255.0;
    let inv = 1.0 - sa;
    let dst = img.get_pixel_mut(x, y);
    dst.0[0] = (255.0 * sa + dst.0[0] as f32 * inv) as u8;
    dst.0[1] = (255.0 * sa + dst.0[1] as f32 * inv) as u8;
    dst.0[2] = (255.0 * sa + dst.0[2] as f32 * inv) as u8;
    dst.0[3] = dst.0[3].max(alpha);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_centered_offset_lands_box_centre_on_target() {
        let bounds = Rect {
            min: point(2, 10),
            max: point(102, 30),
        };
        let (dx, dy) = centered_offset(&bounds, (50, 50));

        let shifted_min = (bounds.min.x + dx, bounds.min.y + dy);
        let shifted_max = (bounds.max.x + dx, bounds.max.y + dy);
        let centre = (
            (shifted_min.0 + shifted_max.0) / 2,
            (shifted_min.1 + shifted_max.1) / 2,
        );
        assert_eq!(centre, (50, 50));
    }

    #[test]
    fn test_centered_offset_tolerates_odd_extents() {
        let bounds = Rect {
            min: point(0, 0),
            max: point(101, 31),
        };
        let (dx, dy) = centered_offset(&bounds, (200, 100));

        let centre_x = (0 + dx + 101 + dx) / 2;
        let centre_y = (0 + dy + 31 + dy) / 2;
        // Integer division leaves at most one pixel of slack.
        assert!((centre_x - 200).abs() <= 1);
        assert!((centre_y - 100).abs() <= 1);
    }

    #[test]
    fn test_blend_white_full_coverage_is_opaque_white() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        blend_white(&mut img, 1, 1, 1.0);
        assert_eq!(*img.get_pixel(1, 1), Rgba([255, 255, 255, 255]));
        // Neighbours untouched.
        assert_eq!(*img.get_pixel(2, 1), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_blend_white_partial_coverage_lightens() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        blend_white(&mut img, 0, 0, 0.5);
        let px = *img.get_pixel(0, 0);
        assert!(px[0] > 100 && px[0] < 150);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_blend_white_clips_out_of_bounds() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        blend_white(&mut img, -1, 0, 1.0);
        blend_white(&mut img, 0, -1, 1.0);
        blend_white(&mut img, 2, 0, 1.0);
        blend_white(&mut img, 0, 2, 1.0);
        for pixel in img.pixels() {
            assert_eq!(*pixel, Rgba([0, 0, 0, 255]));
        }
    }

    #[test]
    fn test_load_font_missing_file() {
        let err = load_font(Path::new("does/not/exist.ttf")).unwrap_err();
        assert!(matches!(err, WelcomerError::FontLoad { .. }));
        assert!(err.is_degradable());
    }

    #[test]
    fn test_load_font_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();

        let err = load_font(&path).unwrap_err();
        assert!(matches!(err, WelcomerError::FontLoad { .. }));
        assert!(err.to_string().contains("not a parsable font file"));
    }
}
