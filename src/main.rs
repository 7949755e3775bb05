use clap::Parser;
use image::{ImageReader, Rgba};
use std::path::PathBuf;

use panelchop::detection::build_panel_pipeline;
use panelchop::{PageProcessor, ProcessorConfig, TextRegionDetector, draw_panel_bounds};

#[derive(Parser)]
#[command(name = "panelchop")]
#[command(about = "Extract comic panels from a scanned page image")]
struct Cli {
    /// Path to the page image
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Directory to write isolated panel crops into (panel_00.png, ...)
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Save a copy of the page with panel bounding boxes stroked on it
    #[arg(long, value_name = "FILE")]
    bounds_file: Option<PathBuf>,

    /// Text-detection model (.rten) enabling reading-order refinement
    #[arg(long, value_name = "FILE")]
    text_model: Option<PathBuf>,

    /// Enable refinement using the text-detection model from the standard
    /// ocrs cache (~/.cache/ocrs)
    #[arg(long, conflicts_with = "text_model")]
    text: bool,

    /// Polygon simplification tolerance, as a fraction of contour perimeter
    #[arg(long, default_value_t = 0.001)]
    precision: f64,

    /// Page-grid divider for the minimum panel area
    #[arg(long, default_value_t = 15.0)]
    min_area_divider: f64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save per-stage debug images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    if args.verbose {
        println!("Loading image: {:?}", args.image_path);
    }

    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    if args.verbose {
        println!("Image loaded: {}x{}\n", img.width(), img.height());
    }

    let config = ProcessorConfig {
        approximation_precision: args.precision,
        min_area_divider: args.min_area_divider,
    };

    // Staged run with debug dumps, if requested; the extraction proper runs
    // through the processor below either way.
    if let Some(debug_dir) = args.debug_out {
        let pipeline = build_panel_pipeline(config.clone(), args.verbose).with_debug(debug_dir)?;
        pipeline.run(img.clone())?;
    }

    let processor = match &args.text_model {
        Some(path) => PageProcessor::with_text_model(config, path)?,
        None if args.text => {
            PageProcessor::new(config).with_text_detector(TextRegionDetector::from_cache_dir()?)
        }
        None => PageProcessor::new(config),
    }
    .with_verbose(args.verbose);

    let result = processor.process_page(&img)?;

    println!("Extracted {} panels", result.len());

    if let Some(out_dir) = &args.out_dir {
        std::fs::create_dir_all(out_dir)?;
        for (i, frame) in result.frames.iter().enumerate() {
            let path = out_dir.join(format!("panel_{:02}.png", i));
            frame
                .save(&path)
                .map_err(|e| anyhow::anyhow!("Failed to save {}: {}", path.display(), e))?;
            if args.verbose {
                println!("  wrote {}", path.display());
            }
        }
    }

    if let Some(bounds_file) = &args.bounds_file {
        let mut preview = img.to_rgba8();
        draw_panel_bounds(&mut preview, &result.panels, Rgba([255, 255, 0, 255]), 2)?;
        preview
            .save(bounds_file)
            .map_err(|e| anyhow::anyhow!("Failed to save bounds image: {}", e))?;
        if args.verbose {
            println!("  wrote {}", bounds_file.display());
        }
    }

    Ok(())
}
