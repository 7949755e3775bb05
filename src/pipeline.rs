//! Composable stage pipeline for the panel-extraction chain.
//!
//! Each stage maps a batch of [`StageData`] to a new batch; a stage may
//! split one page into many panel crops. Running with a debug directory
//! dumps every stage's images, which is the main way to inspect the
//! intermediate edge/threshold/dilation maps.

use anyhow::Result;
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::Arc;

use crate::models::PanelDescriptor;

/// Data flowing through the pipeline: the working image, a shared handle to
/// the untouched page, and the descriptor once a panel has been carved out.
#[derive(Clone)]
pub struct StageData {
    pub image: DynamicImage,
    pub original: Arc<DynamicImage>,
    pub descriptor: Option<PanelDescriptor>,
}

impl StageData {
    /// Wrap a full page image as the pipeline input.
    pub fn from_page(image: DynamicImage) -> Self {
        let original = Arc::new(image.clone());
        Self {
            image,
            original,
            descriptor: None,
        }
    }

    /// Derive a per-panel item from a parent item.
    pub fn from_panel(
        image: DynamicImage,
        original: Arc<DynamicImage>,
        descriptor: PanelDescriptor,
    ) -> Self {
        Self {
            image,
            original,
            descriptor: Some(descriptor),
        }
    }
}

/// Debug-dump configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    pub output_dir: PathBuf,
    pub enabled: bool,
}

/// Context available to all stages
#[derive(Clone)]
pub struct StageContext {
    pub verbose: bool,
    pub debug: Option<DebugConfig>,
}

/// A pipeline stage. Stages can transform items, split one item into many
/// (panel extraction), or drop items (area filtering).
pub trait PipelineStage: Send + Sync {
    fn process(&self, data: Vec<StageData>, context: &StageContext) -> Result<Vec<StageData>>;

    /// Human-readable name for this stage (used in verbose output and debug
    /// directory names)
    fn name(&self) -> &str;
}

/// Sequential pipeline builder.
pub struct Pipeline {
    stages: Vec<Arc<dyn PipelineStage>>,
    context: StageContext,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            context: StageContext {
                verbose: false,
                debug: None,
            },
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.context.verbose = verbose;
        self
    }

    /// Enable per-stage image dumps into `output_dir`.
    /// The directory must be empty or non-existent.
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                anyhow::bail!("debug directory is not empty: {}", output_dir.display());
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig {
            output_dir,
            enabled: true,
        });

        Ok(self)
    }

    pub fn add_stage(mut self, stage: Arc<dyn PipelineStage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Run all stages over a page image.
    pub fn run(&self, input: DynamicImage) -> Result<Vec<StageData>> {
        self.save_debug_input(&input)?;

        let mut data = vec![StageData::from_page(input)];

        for (stage_idx, stage) in self.stages.iter().enumerate() {
            if self.context.verbose {
                println!(
                    "Running stage: {} (processing {} items)",
                    stage.name(),
                    data.len()
                );
            }

            data = stage.process(data, &self.context)?;
            self.save_debug_stage(stage_idx, stage.name(), &data)?;

            if self.context.verbose {
                println!("  -> {} items", data.len());
            }
        }

        Ok(data)
    }

    fn save_debug_input(&self, input: &DynamicImage) -> Result<()> {
        let Some(debug) = &self.context.debug else {
            return Ok(());
        };
        if !debug.enabled {
            return Ok(());
        }

        let input_dir = debug.output_dir.join("00_input");
        std::fs::create_dir_all(&input_dir)?;
        input
            .save(input_dir.join("01.png"))
            .map_err(|e| anyhow::anyhow!("failed to save debug input: {}", e))?;
        Ok(())
    }

    fn save_debug_stage(&self, stage_idx: usize, name: &str, data: &[StageData]) -> Result<()> {
        let Some(debug) = &self.context.debug else {
            return Ok(());
        };
        if !debug.enabled {
            return Ok(());
        }

        let dir_name = format!("{:02}_{}", stage_idx + 1, name.to_lowercase().replace(' ', "_"));
        let stage_dir = debug.output_dir.join(&dir_name);
        std::fs::create_dir_all(&stage_dir)?;

        for (idx, item) in data.iter().enumerate() {
            let path = stage_dir.join(format!("{:02}.png", idx + 1));
            item.image
                .save(&path)
                .map_err(|e| anyhow::anyhow!("failed to save debug image: {}", e))?;
        }

        if self.context.verbose {
            println!("  Debug: saved {} images to {}/", data.len(), dir_name);
        }
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
