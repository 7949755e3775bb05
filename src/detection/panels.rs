use image::DynamicImage;
use imageproc::contours::find_contours;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;

use crate::detection::preprocessing;
use crate::error::EmptyInputError;
use crate::models::PanelDescriptor;
use crate::processor::ProcessorConfig;

/// Edge-intensity cutoff applied to the Laplacian map (out of 255).
pub const EDGE_INTENSITY_CUTOFF: u8 = 50;

/// Detect candidate panel regions on a page image.
///
/// Deterministic single pass: grayscale, Laplacian edge map, binary
/// threshold, one 3x3 dilation, then external contour extraction. Each
/// contour is simplified to a polygon with a tolerance proportional to its
/// perimeter and kept only if the contour's own area clears the page-scaled
/// floor `(H / min_area_divider) * (W / min_area_divider)`.
///
/// Descriptors are returned in contour-discovery order; reading order is
/// the orchestrator's concern, not the detector's.
pub fn detect_panels(
    img: &DynamicImage,
    config: &ProcessorConfig,
) -> Result<Vec<PanelDescriptor>, EmptyInputError> {
    EmptyInputError::check(img.width(), img.height())?;

    let gray = preprocessing::to_grayscale(img);
    let edges = preprocessing::laplacian_edges(&gray);
    let binary = preprocessing::threshold_binary(&edges, EDGE_INTENSITY_CUTOFF);
    let dilated = preprocessing::dilate_edges(&binary);

    let min_area = (img.height() as f64 / config.min_area_divider)
        * (img.width() as f64 / config.min_area_divider);

    let mut panels = Vec::new();
    for contour in find_contours::<i32>(&dilated) {
        // External borders only: nested shapes inside a panel outline are
        // part of that panel, not panels of their own.
        if contour.parent.is_some() {
            continue;
        }

        let area = contour_area(&contour.points);
        if area <= min_area {
            continue;
        }

        let epsilon = config.approximation_precision * arc_length(&contour.points, true);
        let polygon = approximate_polygon_dp(&contour.points, epsilon, true);
        if let Some(panel) = PanelDescriptor::from_polygon(polygon) {
            panels.push(panel);
        }
    }

    Ok(panels)
}

/// Shoelace area of a closed contour.
pub(crate) fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0f64;
    let n = points.len();
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x as f64 * points[j].y as f64;
        area -= points[j].x as f64 * points[i].y as f64;
    }
    (area * 0.5).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shoelace_area_of_rectangle() {
        let rect = vec![
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 4),
            Point::new(0, 4),
        ];
        assert_eq!(contour_area(&rect), 40.0);
    }

    #[test]
    fn shoelace_area_degenerate() {
        assert_eq!(contour_area(&[Point::new(0, 0), Point::new(5, 5)]), 0.0);
    }
}
