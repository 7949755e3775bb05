pub mod isolate;
pub mod panels;
pub mod preprocessing;
pub mod steps;
pub mod text;

pub use isolate::{draw_panel_bounds, isolate_panels};
pub use panels::detect_panels;
pub use text::TextRegionDetector;

use crate::pipeline::Pipeline;
use crate::processor::ProcessorConfig;

/// Assemble the standard panel-extraction chain as a composable pipeline.
///
/// Functionally equivalent to running the detector and isolator directly,
/// but each stage's output can be dumped via [`Pipeline::with_debug`].
pub fn build_panel_pipeline(config: ProcessorConfig, verbose: bool) -> Pipeline {
    use crate::detection::steps::*;
    use std::sync::Arc;

    Pipeline::new()
        .with_verbose(verbose)
        .add_stage(Arc::new(GrayscaleStage))
        .add_stage(Arc::new(LaplacianStage))
        .add_stage(Arc::new(ThresholdStage {
            cutoff: panels::EDGE_INTENSITY_CUTOFF,
        }))
        .add_stage(Arc::new(DilateStage))
        .add_stage(Arc::new(PanelSplitStage { config }))
        .add_stage(Arc::new(IsolateStage))
}
