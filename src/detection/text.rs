use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use std::path::Path;

use crate::error::EmptyInputError;
use crate::models::BoundingBox;

/// Text-region detector backed by an externally supplied `.rten` model.
///
/// Only the detection half of the OCR stack is loaded; panelchop never
/// transcribes text, it only uses region locations as an ordering signal.
/// The model file is read once at construction and its inference interface
/// is consumed as a black box.
pub struct TextRegionDetector {
    engine: OcrEngine,
}

impl std::fmt::Debug for TextRegionDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // `OcrEngine` is not `Debug`; the engine field is elided.
        f.debug_struct("TextRegionDetector").finish_non_exhaustive()
    }
}

impl TextRegionDetector {
    /// Load a detection model from an explicit path.
    pub fn from_model_file(path: &Path) -> anyhow::Result<Self> {
        let detection_model = Model::load_file(path)?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: None,
            ..Default::default()
        })?;

        Ok(Self { engine })
    }

    /// Load the detection model from the standard ocrs cache location.
    pub fn from_cache_dir() -> anyhow::Result<Self> {
        let home_dir = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        let model_path = Path::new(&home_dir).join(".cache/ocrs/text-detection.rten");

        if !model_path.exists() {
            anyhow::bail!(
                "text detection model not found at {} (download it with ocrs-cli, \
                 or pass an explicit model path)",
                model_path.display()
            );
        }

        Self::from_model_file(&model_path)
    }

    /// Detect text regions on a page, as axis-aligned boxes in page space.
    ///
    /// Word-level detections from the model are used directly; boxes are
    /// clamped to the image and empty ones dropped. Inference failures are
    /// fatal to the call, there is no partial-result contract.
    pub fn detect(&self, img: &DynamicImage) -> anyhow::Result<Vec<BoundingBox>> {
        EmptyInputError::check(img.width(), img.height())?;

        let rgb = img.to_rgb8();
        let source = ImageSource::from_bytes(rgb.as_raw(), rgb.dimensions())?;
        let input = self.engine.prepare_input(source)?;
        let words = self.engine.detect_words(&input)?;

        let (w, h) = (img.width() as f32, img.height() as f32);
        let mut regions = Vec::with_capacity(words.len());
        for word in words {
            let corners = word.corners();
            let mut min_x = f32::MAX;
            let mut min_y = f32::MAX;
            let mut max_x = f32::MIN;
            let mut max_y = f32::MIN;
            for corner in corners {
                min_x = min_x.min(corner.x);
                min_y = min_y.min(corner.y);
                max_x = max_x.max(corner.x);
                max_y = max_y.max(corner.y);
            }

            let x = min_x.clamp(0.0, w).floor() as u32;
            let y = min_y.clamp(0.0, h).floor() as u32;
            let right = max_x.clamp(0.0, w).ceil() as u32;
            let bottom = max_y.clamp(0.0, h).ceil() as u32;
            if right <= x || bottom <= y {
                continue;
            }

            regions.push(BoundingBox {
                x,
                y,
                width: right - x,
                height: bottom - y,
            });
        }

        Ok(regions)
    }
}
