//! Synthetic page fixtures shared across integration tests.

use image::{DynamicImage, Rgb, RgbImage};

/// Plain white page.
pub fn blank_page(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
}

/// White page with one solid black rectangle.
pub fn page_with_rect(
    page_width: u32,
    page_height: u32,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> DynamicImage {
    let mut img = RgbImage::from_pixel(page_width, page_height, Rgb([255, 255, 255]));
    fill_rect(&mut img, x, y, width, height, Rgb([0, 0, 0]));
    DynamicImage::ImageRgb8(img)
}

/// White page with several solid black rectangles.
pub fn page_with_rects(
    page_width: u32,
    page_height: u32,
    rects: &[(u32, u32, u32, u32)],
) -> DynamicImage {
    let mut img = RgbImage::from_pixel(page_width, page_height, Rgb([255, 255, 255]));
    for &(x, y, w, h) in rects {
        fill_rect(&mut img, x, y, w, h, Rgb([0, 0, 0]));
    }
    DynamicImage::ImageRgb8(img)
}

/// Uniformly colored page, for pixel-identity checks after isolation.
pub fn solid_page(width: u32, height: u32, color: Rgb<u8>) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, color))
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    for py in y..(y + height).min(img.height()) {
        for px in x..(x + width).min(img.width()) {
            img.put_pixel(px, py, color);
        }
    }
}
