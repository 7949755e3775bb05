use image::{DynamicImage, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::laplacian_filter;
use imageproc::morphology;

/// Convert image to single-channel grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Laplacian edge-intensity map, saturated to 8 bits.
///
/// Negative filter responses clamp to zero rather than wrapping, so only
/// one side of each edge survives; the later dilation closes the gap.
pub fn laplacian_edges(gray: &GrayImage) -> GrayImage {
    let filtered = laplacian_filter(gray);
    let mut edges = GrayImage::new(gray.width(), gray.height());
    for (x, y, pixel) in filtered.enumerate_pixels() {
        let v = pixel[0].clamp(0, 255) as u8;
        edges.put_pixel(x, y, Luma([v]));
    }
    edges
}

/// Binary threshold: pixels strictly above `cutoff` become 255, the rest 0.
pub fn threshold_binary(img: &GrayImage, cutoff: u8) -> GrayImage {
    let mut binary = GrayImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        let v = if pixel[0] > cutoff { 255 } else { 0 };
        binary.put_pixel(x, y, Luma([v]));
    }
    binary
}

/// One iteration of 3x3 dilation (Chebyshev radius 1), closing small gaps
/// in panel borders so they form closed contours.
pub fn dilate_edges(binary: &GrayImage) -> GrayImage {
    morphology::dilate(binary, Norm::LInf, 1)
}

/// One iteration of 3x3 erosion, shrinking a filled mask inward by a pixel.
pub fn erode_mask(mask: &GrayImage) -> GrayImage {
    morphology::erode(mask, Norm::LInf, 1)
}
