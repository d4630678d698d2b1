use clap::Parser;
use sketchcomplete::{Document, MomentumModel, MomentumParams, SketchConfig};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "sketchcomplete", about = "Complete a vector sketch with a stroke sequence model")]
struct Cli {
    /// Input SVG to use as the start of the sketch
    #[arg(short, long)]
    input: PathBuf,

    /// Output SVG path
    #[arg(short, long)]
    output: PathBuf,

    /// Model parameters (JSON). Built-in defaults if omitted.
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Maximum deviation between curves and their polylines
    #[arg(long, default_value = "4.0")]
    flattening_error: f64,

    /// Sampling temperature (lower = more conservative)
    #[arg(short, long, default_value = "0.25")]
    temperature: f64,

    /// Scale between drawing units and model units
    #[arg(long, default_value = "1.0")]
    pixel_factor: f64,

    /// Stop sampling after this many tokens (0 = never)
    #[arg(long, default_value = "512")]
    max_tokens: usize,

    /// Random seed for the model
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Keep decoded strokes as straight segments
    #[arg(long)]
    no_smooth: bool,

    /// Stroke width in the output drawing
    #[arg(long, default_value = "1.0")]
    stroke_width: f64,

    /// Also write the full stroke-5 sequence as JSON
    #[arg(long)]
    strokes: Option<PathBuf>,

    /// Also write a PNG preview
    #[arg(long)]
    preview: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let t_start = Instant::now();

    let config = SketchConfig {
        flattening_error: cli.flattening_error,
        temperature: cli.temperature,
        pixel_factor: cli.pixel_factor,
        max_generated_tokens: (cli.max_tokens > 0).then_some(cli.max_tokens),
        smooth: !cli.no_smooth,
        stroke_width: cli.stroke_width,
        ..SketchConfig::default()
    };

    // Header
    eprintln!();
    eprintln!("  sketchcomplete \u{00b7} {}", cli.input.display());
    eprintln!();

    // Both inputs are loaded before anything runs.
    let mut model = match &cli.model {
        Some(path) => MomentumModel::load(path, cli.seed)?,
        None => MomentumModel::new(MomentumParams::default(), cli.seed)?,
    };
    let svg = std::fs::read_to_string(&cli.input)?;
    let document = Document::from_svg(&svg)?;
    let model_name = cli
        .model
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    eprintln!("  Load        model {} \u{00b7} seed {}", model_name, cli.seed);

    let outcome = sketchcomplete::complete(&document, &mut model, &config)?;
    let generation = &outcome.generation;
    eprintln!(
        "  Encode      {} prefix tokens (\u{03b5} = {})",
        generation.prefix_len, config.flattening_error
    );
    eprintln!(
        "  Generate    {} sampled tokens at T = {}{}",
        generation.sampled,
        config.temperature,
        if generation.truncated { "  (token bound reached)" } else { "" }
    );
    let frame = outcome.drawing.frame.unwrap_or_default();
    eprintln!(
        "  Decode      {} sub-paths \u{00b7} frame {:.0}\u{00d7}{:.0}  ({}ms)",
        outcome.drawing.paths.len(),
        frame.width(),
        frame.height(),
        t_start.elapsed().as_millis(),
    );

    std::fs::write(&cli.output, sketchcomplete::output::svg::to_svg(&outcome.drawing, &config))?;

    if let Some(path) = &cli.strokes {
        std::fs::write(path, serde_json::to_string(&generation.sequence)?)?;
        eprintln!("  Strokes     {}", path.display());
    }

    if let Some(path) = &cli.preview {
        write_preview(&outcome.drawing, &config, path)?;
    }

    // Footer
    eprintln!();
    eprintln!("  \u{2713} {}", cli.output.display());
    eprintln!();

    Ok(())
}

#[cfg(feature = "preview")]
fn write_preview(
    drawing: &sketchcomplete::Reconstruction,
    config: &SketchConfig,
    path: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let png = sketchcomplete::render::render_png(drawing, config, 800, 20)?;
    std::fs::write(path, png)?;
    eprintln!("  Preview     {}", path.display());
    Ok(())
}

#[cfg(not(feature = "preview"))]
fn write_preview(
    _drawing: &sketchcomplete::Reconstruction,
    _config: &SketchConfig,
    _path: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    Err("built without the `preview` feature".into())
}
