use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_polygon_mut};

use crate::detection::preprocessing;
use crate::error::EmptyInputError;
use crate::models::{BoundingBox, PanelDescriptor};

/// Isolate each detected panel into a standalone crop.
///
/// One RGBA output per descriptor, in the same order. A crop's dimensions
/// equal its bounding box; pixels outside the (eroded) panel polygon are
/// left fully transparent.
pub fn isolate_panels(
    img: &DynamicImage,
    panels: &[PanelDescriptor],
) -> Result<Vec<DynamicImage>, EmptyInputError> {
    EmptyInputError::check(img.width(), img.height())?;

    let src = img.to_rgba8();
    let frames = panels
        .iter()
        .map(|panel| isolate_one(&src, panel))
        .collect();
    Ok(frames)
}

/// Cut one panel out of the page.
///
/// The polygon is translated into the crop's local frame before filling, so
/// it lines up with the crop even though it was traced in page space. The
/// filled mask is eroded by one pixel to drop the panel's own border line
/// and any anti-aliased bleed from the scan.
pub(crate) fn isolate_one(src: &RgbaImage, panel: &PanelDescriptor) -> DynamicImage {
    let bb = &panel.bounding_box;
    let crop = image::imageops::crop_imm(src, bb.x, bb.y, bb.width, bb.height).to_image();

    let mut mask = GrayImage::new(bb.width, bb.height);
    let local = panel.local_polygon();
    if local.len() >= 3 {
        draw_polygon_mut(&mut mask, &local, Luma([255u8]));
    }
    let eroded = preprocessing::erode_mask(&mask);

    let mut isolated = RgbaImage::new(bb.width, bb.height);
    for (x, y, pixel) in crop.enumerate_pixels() {
        if eroded.get_pixel(x, y)[0] > 0 {
            isolated.put_pixel(x, y, *pixel);
        }
    }

    DynamicImage::ImageRgba8(isolated)
}

/// Stroke each panel's bounding box onto `dst` in place, for preview and
/// debugging. Thickness grows inward so strokes stay within the image.
pub fn draw_panel_bounds(
    dst: &mut RgbaImage,
    panels: &[PanelDescriptor],
    color: Rgba<u8>,
    thickness: u32,
) -> Result<(), EmptyInputError> {
    EmptyInputError::check(dst.width(), dst.height())?;

    for panel in panels {
        let bb = &panel.bounding_box;
        for i in 0..thickness {
            if bb.width <= 2 * i || bb.height <= 2 * i {
                break;
            }
            let inset = BoundingBox {
                x: bb.x + i,
                y: bb.y + i,
                width: bb.width - 2 * i,
                height: bb.height - 2 * i,
            };
            draw_hollow_rect_mut(dst, inset.to_rect(), color);
        }
    }

    Ok(())
}
