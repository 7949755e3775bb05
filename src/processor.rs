use anyhow::Result;
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

use crate::detection::isolate::isolate_panels;
use crate::detection::panels::detect_panels;
use crate::detection::text::TextRegionDetector;
use crate::models::{BoundingBox, ComicPageResult, PanelDescriptor};

/// Tunable knobs for one extraction run.
///
/// Plain value type: each run reads a frozen snapshot, so edits between
/// runs take effect on the next full re-run and never touch results that
/// were already produced.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Fraction of a contour's perimeter used as the polygon-simplification
    /// tolerance.
    pub approximation_precision: f64,

    /// The page is divided into an (H/divider) x (W/divider) grid cell and
    /// only regions larger than one such cell are kept as panels. Raising
    /// the divider shrinks the cell and admits smaller regions; lowering it
    /// rejects more.
    pub min_area_divider: f64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            approximation_precision: 0.001,
            min_area_divider: 15.0,
        }
    }
}

/// Strategy applied by [`PageProcessor::process_chop`] once text regions are
/// known.
///
/// A refiner may reorder, merge, or split whole panel crops, but it must
/// never invent pixel content: `frames` entries can move as units, they
/// cannot be repainted. Implementations must keep `panels` and `frames`
/// index-aligned.
pub trait ChopRefiner: Send + Sync {
    fn refine(&self, text_regions: &[BoundingBox], result: &mut ComicPageResult) -> Result<()>;

    /// Human-readable name (used in verbose output)
    fn name(&self) -> &str;
}

/// Default refiner: orders panels into reading order.
///
/// Panels are grouped into horizontal bands (a panel joins a band when its
/// bounding box shares rows with the band's first panel); bands run top to
/// bottom, panels left to right within a band. When a panel contains text
/// regions, the topmost contained region's y replaces the panel top as its
/// vertical key, letting dialogue placement pull a panel earlier.
pub struct ReadingOrderRefiner;

impl ReadingOrderRefiner {
    /// Compute the reading-order permutation over panel indices.
    pub fn order(panels: &[PanelDescriptor], text_regions: &[BoundingBox]) -> Vec<usize> {
        let key_y: Vec<u32> = panels
            .iter()
            .map(|panel| {
                text_regions
                    .iter()
                    .filter(|t| {
                        let cx = t.x + t.width / 2;
                        let cy = t.y + t.height / 2;
                        panel.contains_point(cx, cy)
                    })
                    .map(|t| t.y)
                    .min()
                    .unwrap_or(panel.bounding_box.y)
            })
            .collect();

        let mut order: Vec<usize> = (0..panels.len()).collect();
        order.sort_by_key(|&i| key_y[i]);

        // Greedy band assembly over the vertically sorted panels.
        let mut bands: Vec<Vec<usize>> = Vec::new();
        for idx in order {
            let bbox = &panels[idx].bounding_box;
            match bands.last_mut() {
                Some(band) if panels[band[0]].bounding_box.overlaps_vertically(bbox) => {
                    band.push(idx);
                }
                _ => bands.push(vec![idx]),
            }
        }

        let mut sorted = Vec::with_capacity(panels.len());
        for mut band in bands {
            band.sort_by_key(|&i| panels[i].bounding_box.x);
            sorted.extend(band);
        }
        sorted
    }
}

impl ChopRefiner for ReadingOrderRefiner {
    fn refine(&self, text_regions: &[BoundingBox], result: &mut ComicPageResult) -> Result<()> {
        let order = Self::order(&result.panels, text_regions);

        let mut panels: Vec<Option<PanelDescriptor>> =
            result.panels.drain(..).map(Some).collect();
        let mut frames: Vec<Option<DynamicImage>> = result.frames.drain(..).map(Some).collect();

        for &i in &order {
            result.panels.push(panels[i].take().expect("index used twice"));
            result.frames.push(frames[i].take().expect("index used twice"));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "Reading Order"
    }
}

/// Orchestrates the panel pipeline for one page: detection, isolation and
/// the optional text-assisted chop refinement.
pub struct PageProcessor {
    pub config: ProcessorConfig,
    verbose: bool,
    text_detector: Option<TextRegionDetector>,
    refiner: Box<dyn ChopRefiner>,
}

impl PageProcessor {
    /// "No-text" variant: the chop refinement step becomes a pass-through.
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            verbose: false,
            text_detector: None,
            refiner: Box::new(ReadingOrderRefiner),
        }
    }

    /// Variant with a text-region detection model, loaded once from `path`.
    pub fn with_text_model(config: ProcessorConfig, path: &Path) -> Result<Self> {
        let detector = TextRegionDetector::from_model_file(path)?;
        Ok(Self::new(config).with_text_detector(detector))
    }

    pub fn with_text_detector(mut self, detector: TextRegionDetector) -> Self {
        self.text_detector = Some(detector);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Swap the chop-refinement strategy.
    pub fn with_refiner(mut self, refiner: Box<dyn ChopRefiner>) -> Self {
        self.refiner = refiner;
        self
    }

    /// Run the detector and isolator, filling `out.panels` and `out.frames`
    /// in the order descriptors were produced.
    pub fn process_panels(&self, img: &DynamicImage, out: &mut ComicPageResult) -> Result<()> {
        let config = self.config.clone();

        out.panels = detect_panels(img, &config)?;
        if self.verbose {
            println!("[panelchop] found {} panels", out.panels.len());
        }

        out.frames = isolate_panels(img, &out.panels)?;
        if self.verbose {
            println!("[panelchop] chopped {} frames", out.frames.len());
        }

        Ok(())
    }

    /// Consult the text-detection model (when attached) and let the refiner
    /// adjust panel order. Without a model this is a no-op pass-through.
    pub fn process_chop(&self, img: &DynamicImage, out: &mut ComicPageResult) -> Result<()> {
        let Some(detector) = &self.text_detector else {
            return Ok(());
        };

        let text_regions = detector.detect(img)?;
        if self.verbose {
            println!(
                "[panelchop] found {} text regions, refining with {}",
                text_regions.len(),
                self.refiner.name()
            );
        }

        self.refiner.refine(&text_regions, out)
    }

    /// Full extraction: panels, then chop refinement.
    pub fn process_page(&self, img: &DynamicImage) -> Result<ComicPageResult> {
        let mut out = ComicPageResult::new();
        self.process_panels(img, &mut out)?;
        self.process_chop(img, &mut out)?;
        Ok(out)
    }
}

/// Run a full extraction on a worker thread.
///
/// The pipeline itself stays synchronous; callers that need a responsive
/// foreground (UI event loops, servers) receive the result over the
/// returned channel instead of blocking on the scan.
pub fn process_page_background(
    proc: Arc<PageProcessor>,
    img: DynamicImage,
) -> Receiver<Result<ComicPageResult>> {
    let (sender, receiver) = mpsc::channel();
    std::thread::spawn(move || {
        // A dropped receiver just discards the result.
        let _ = sender.send(proc.process_page(&img));
    });
    receiver
}
