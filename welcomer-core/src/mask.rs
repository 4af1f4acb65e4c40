// ABOUTME: Circular avatar masking with a solid border ring
// ABOUTME: Classifies pixels against two inscribed ellipses; hard-edged, deterministic

use crate::error::WelcomerError;
use image::{Rgba, RgbaImage};

const RING_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Cut `avatar` into a circle and surround it with an opaque ring of
/// `border` pixels. The output is `2 * border` larger on each axis;
/// everything outside the outer circle is fully transparent and pixels
/// inside the cutout keep the source alpha.
pub fn circular_avatar(avatar: &RgbaImage, border: u32) -> Result<RgbaImage, WelcomerError> {
    let (width, height) = avatar.dimensions();
    if width == 0 || height == 0 {
        return Err(WelcomerError::InvalidDimensions { width, height });
    }

    let out_width = width + 2 * border;
    let out_height = height + 2 * border;
    let mut out = RgbaImage::new(out_width, out_height);

    for y in 0..out_height {
        for x in 0..out_width {
            if !inside_ellipse(x, y, 0, 0, out_width, out_height) {
                continue;
            }
            let pixel = if inside_ellipse(x, y, border, border, width, height) {
                *avatar.get_pixel(x - border, y - border)
            } else {
                RING_COLOR
            };
            out.put_pixel(x, y, pixel);
        }
    }

    Ok(out)
}

/// Pixel-centre test against the ellipse inscribed in the box at
/// (`left`, `top`) with the given extent. Hard edge, no anti-aliasing.
fn inside_ellipse(x: u32, y: u32, left: u32, top: u32, width: u32, height: u32) -> bool {
    let rx = width as f64 / 2.0;
    let ry = height as f64 / 2.0;
    let cx = left as f64 + rx;
    let cy = top as f64 + ry;
    let dx = (x as f64 + 0.5 - cx) / rx;
    let dy = (y as f64 + 0.5 - cy) / ry;
    dx * dx + dy * dy <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(rgba))
    }

    #[test]
    fn test_output_dimensions_add_twice_the_border() {
        let avatar = solid(124, 124, [10, 20, 30, 255]);
        let out = circular_avatar(&avatar, 3).unwrap();
        assert_eq!(out.dimensions(), (130, 130));

        let out = circular_avatar(&avatar, 0).unwrap();
        assert_eq!(out.dimensions(), (124, 124));
    }

    #[test]
    fn test_alpha_is_zero_outside_the_circle() {
        let avatar = solid(124, 124, [10, 20, 30, 255]);
        let out = circular_avatar(&avatar, 3).unwrap();

        let (w, h) = out.dimensions();
        let rx = w as f64 / 2.0;
        let ry = h as f64 / 2.0;
        for y in 0..h {
            for x in 0..w {
                let dx = (x as f64 + 0.5 - rx) / rx;
                let dy = (y as f64 + 0.5 - ry) / ry;
                if dx * dx + dy * dy > 1.0 {
                    assert_eq!(out.get_pixel(x, y)[3], 0, "pixel ({}, {}) leaks", x, y);
                }
            }
        }
        // Corners are always outside.
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(w - 1, h - 1)[3], 0);
    }

    #[test]
    fn test_centre_keeps_avatar_pixel_and_alpha() {
        let avatar = solid(124, 124, [10, 20, 30, 200]);
        let out = circular_avatar(&avatar, 3).unwrap();

        let centre = *out.get_pixel(65, 65);
        assert_eq!(centre, Rgba([10, 20, 30, 200]));
    }

    #[test]
    fn test_ring_is_opaque_white() {
        let avatar = solid(124, 124, [10, 20, 30, 255]);
        let border = 3;
        let out = circular_avatar(&avatar, border).unwrap();

        // On the horizontal midline, the first pixel is inside the outer
        // ellipse but left of the inner one: ring territory.
        let y = out.height() / 2;
        assert_eq!(*out.get_pixel(1, y), Rgba([255, 255, 255, 255]));
        assert_eq!(*out.get_pixel(out.width() - 2, y), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_zero_border_has_no_ring() {
        let avatar = solid(50, 50, [1, 2, 3, 255]);
        let out = circular_avatar(&avatar, 0).unwrap();

        let y = out.height() / 2;
        // Midline edge pixel comes straight from the avatar.
        assert_eq!(*out.get_pixel(0, y), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_zero_dimensions_are_a_precondition_violation() {
        let avatar = RgbaImage::new(0, 0);
        let err = circular_avatar(&avatar, 3).unwrap_err();
        assert!(matches!(
            err,
            WelcomerError::InvalidDimensions {
                width: 0,
                height: 0
            }
        ));
        assert!(!err.is_degradable());
    }

    #[test]
    fn test_non_square_input_masks_to_inscribed_ellipse() {
        let avatar = solid(60, 30, [9, 9, 9, 255]);
        let out = circular_avatar(&avatar, 2).unwrap();
        assert_eq!(out.dimensions(), (64, 34));
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(32, 17)[3], 255);
    }
}
