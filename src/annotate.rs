//! Drawing side effects for the reference CLI driver (spec.md §6: "opaque
//! save format", "display/save side effects are treated as external
//! collaborators"). Scales detected boxes back to full-resolution
//! coordinates, draws them, and rotates the frame 90 degrees — matching the
//! original implementation's `img_rgb.rotate(-90).save(...)` driver loop
//! (`examples/original_source/main.cpp`).

use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use motion_core::BoundingBox;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Draws `bboxes` (in the detector's working/downscaled coordinate system)
/// onto a full-color copy of `frame`, scaling each box back to
/// full-resolution by `downscale_factor`, then rotates the result 90
/// degrees the way the original driver's `rotate(-90)` call does.
pub fn annotate_and_rotate(frame: &GrayImage, bboxes: &[BoundingBox], downscale_factor: u32) -> RgbImage {
    let mut canvas: RgbImage = image::DynamicImage::ImageLuma8(frame.clone()).to_rgb8();

    for bbox in bboxes {
        let x = (bbox.topleft_x * downscale_factor) as i32;
        let y = (bbox.topleft_y * downscale_factor) as i32;
        let w = (bbox.width() * downscale_factor).max(1);
        let h = (bbox.height() * downscale_factor).max(1);
        let rect = Rect::at(x, y).of_size(w, h);
        draw_hollow_rect_mut(&mut canvas, rect, BOX_COLOR);
    }

    image::imageops::rotate270(&canvas)
}
