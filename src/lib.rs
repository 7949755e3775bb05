pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod processor;

pub use detection::{TextRegionDetector, detect_panels, draw_panel_bounds, isolate_panels};
pub use error::EmptyInputError;
pub use models::{BoundingBox, ComicPageResult, PanelDescriptor};
pub use pipeline::{DebugConfig, Pipeline, PipelineStage, StageContext, StageData};
pub use processor::{
    ChopRefiner, PageProcessor, ProcessorConfig, ReadingOrderRefiner, process_page_background,
};
