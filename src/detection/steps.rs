//! [`PipelineStage`] implementations mirroring the core detection chain, so
//! the whole extraction can be run with per-stage debug dumps.

use anyhow::Result;
use image::DynamicImage;
use imageproc::contours::find_contours;
use imageproc::geometry::{approximate_polygon_dp, arc_length};

use crate::detection::isolate::isolate_one;
use crate::detection::preprocessing;
use crate::models::PanelDescriptor;
use crate::pipeline::{PipelineStage, StageContext, StageData};
use crate::processor::ProcessorConfig;

/// Convert image to grayscale
pub struct GrayscaleStage;

impl PipelineStage for GrayscaleStage {
    fn process(&self, data: Vec<StageData>, _context: &StageContext) -> Result<Vec<StageData>> {
        let mut result = Vec::new();
        for mut item in data {
            let gray = preprocessing::to_grayscale(&item.image);
            item.image = DynamicImage::ImageLuma8(gray);
            result.push(item);
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Laplacian edge-intensity map
pub struct LaplacianStage;

impl PipelineStage for LaplacianStage {
    fn process(&self, data: Vec<StageData>, _context: &StageContext) -> Result<Vec<StageData>> {
        let mut result = Vec::new();
        for mut item in data {
            let gray = item.image.to_luma8();
            item.image = DynamicImage::ImageLuma8(preprocessing::laplacian_edges(&gray));
            result.push(item);
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Laplacian Edges"
    }
}

/// Binary threshold of the edge map
pub struct ThresholdStage {
    pub cutoff: u8,
}

impl PipelineStage for ThresholdStage {
    fn process(&self, data: Vec<StageData>, _context: &StageContext) -> Result<Vec<StageData>> {
        let mut result = Vec::new();
        for mut item in data {
            let gray = item.image.to_luma8();
            item.image = DynamicImage::ImageLuma8(preprocessing::threshold_binary(&gray, self.cutoff));
            result.push(item);
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Binary Threshold"
    }
}

/// One 3x3 dilation pass over the binary edge mask
pub struct DilateStage;

impl PipelineStage for DilateStage {
    fn process(&self, data: Vec<StageData>, _context: &StageContext) -> Result<Vec<StageData>> {
        let mut result = Vec::new();
        for mut item in data {
            let gray = item.image.to_luma8();
            item.image = DynamicImage::ImageLuma8(preprocessing::dilate_edges(&gray));
            result.push(item);
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Dilation"
    }
}

/// Extract panel contours from the dilated mask and split the page into one
/// item per surviving panel, each cropped to its bounding box. Mirrors the
/// detector's contour/area logic, but runs on whatever binary image the
/// previous stages produced.
pub struct PanelSplitStage {
    pub config: ProcessorConfig,
}

impl PipelineStage for PanelSplitStage {
    fn process(&self, data: Vec<StageData>, context: &StageContext) -> Result<Vec<StageData>> {
        let mut result = Vec::new();

        for item in data {
            let mask = item.image.to_luma8();
            let original = item.original.clone();
            let min_area = (original.height() as f64 / self.config.min_area_divider)
                * (original.width() as f64 / self.config.min_area_divider);

            for contour in find_contours::<i32>(&mask) {
                if contour.parent.is_some() {
                    continue;
                }
                if crate::detection::panels::contour_area(&contour.points) <= min_area {
                    continue;
                }

                let epsilon =
                    self.config.approximation_precision * arc_length(&contour.points, true);
                let polygon = approximate_polygon_dp(&contour.points, epsilon, true);
                let Some(panel) = PanelDescriptor::from_polygon(polygon) else {
                    continue;
                };

                let bb = &panel.bounding_box;
                let crop = original.crop_imm(bb.x, bb.y, bb.width, bb.height);
                result.push(StageData::from_panel(crop, original.clone(), panel));
            }
        }

        if context.verbose {
            println!("  {} panels survived the area floor", result.len());
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Panel Split"
    }
}

/// Mask each panel crop to its (eroded) polygon, blanking the background.
pub struct IsolateStage;

impl PipelineStage for IsolateStage {
    fn process(&self, data: Vec<StageData>, _context: &StageContext) -> Result<Vec<StageData>> {
        let mut result = Vec::new();
        for mut item in data {
            let Some(panel) = item.descriptor.clone() else {
                // Nothing to mask against; pass the item through untouched.
                result.push(item);
                continue;
            };
            let src = item.original.to_rgba8();
            item.image = isolate_one(&src, &panel);
            result.push(item);
        }
        Ok(result)
    }

    fn name(&self) -> &str {
        "Isolation"
    }
}
