//! sketchcomplete: vector drawing → stroke-5 sequence → completed drawing.
//!
//! Flattens a drawing's paths into polylines, encodes them as relative
//! stroke tokens, lets a sequence model continue the drawing, and turns
//! the finished token stream back into smooth vector paths.
//!
//! # Example
//!
//! ```no_run
//! use sketchcomplete::{complete, Document, MomentumModel, MomentumParams, SketchConfig};
//!
//! let svg = std::fs::read_to_string("sketch.svg")?;
//! let document = Document::from_svg(&svg)?;
//! let mut model = MomentumModel::new(MomentumParams::default(), 42)?;
//! let result = complete(&document, &mut model, &SketchConfig::default())?;
//! // result.drawing.paths contains Vec<kurbo::BezPath>
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod config;
mod smooth;

pub mod decode;
pub mod document;
pub mod encode;
pub mod error;
pub mod flatten;
pub mod generate;
pub mod model;
pub mod output;
pub mod stroke;

#[cfg(feature = "preview")]
pub mod render;

// Re-export kurbo so downstream users get the same version
// used by Reconstruction.paths (Vec<kurbo::BezPath>).
pub use kurbo;

pub use config::SketchConfig;
pub use decode::DecodedStrokes;
pub use document::{Document, Node, PathItem};
pub use encode::EncodedDrawing;
pub use error::{SketchError, SketchResult};
pub use flatten::FlattenedPath;
pub use generate::{Generation, GenerationOptions};
pub use model::{MomentumModel, MomentumParams, SequenceModel};
pub use stroke::{Pen, PenState, StrokeSequence, StrokeToken};

use kurbo::{BezPath, Point, Rect, Shape};

/// Output geometry: one path per decoded sub-path plus the frame to show
/// them in.
#[derive(Debug, Clone, Default)]
pub struct Reconstruction {
    pub paths: Vec<BezPath>,
    /// Bounds of the decoded points united with the bounds of the smoothed
    /// curves. `None` when nothing was drawn.
    pub frame: Option<Rect>,
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct SketchOutcome {
    /// Absolute position the token stream starts from.
    pub origin: Point,
    pub generation: Generation,
    pub decoded: DecodedStrokes,
    pub drawing: Reconstruction,
}

/// Full pipeline: drawing → tokens → model completion → drawing.
///
/// Every intermediate value is owned by this call, so independent runs
/// never share state.
pub fn complete<M: SequenceModel>(
    document: &Document,
    model: &mut M,
    config: &SketchConfig,
) -> SketchResult<SketchOutcome> {
    config.validate()?;

    // ── Flatten & encode ──────────────────────────────────
    let flattened = flatten::flatten_document(document, config.flattening_error);
    let encoded = encode::encode(&flattened);
    log::info!(
        "flattened {} sub-paths \u{2192} {} prefix tokens",
        flattened.len(),
        encoded.sequence.len()
    );

    // ── Generate ──────────────────────────────────────────
    model.set_pixel_factor(config.pixel_factor);
    let options = GenerationOptions {
        temperature: config.temperature,
        max_tokens: config.max_generated_tokens,
    };
    let generation = generate::generate(model, &encoded.sequence, &options)?;
    log::info!(
        "sampled {} tokens at temperature {}{}",
        generation.sampled,
        config.temperature,
        if generation.truncated { " (hit token bound)" } else { "" }
    );

    // ── Decode & reconstruct ──────────────────────────────
    let decoded = decode::decode(&generation.sequence, encoded.origin);
    let drawing = reconstruct(&decoded, config.smooth);

    Ok(SketchOutcome {
        origin: encoded.origin,
        generation,
        decoded,
        drawing,
    })
}

/// Build output paths from decoded polylines.
pub fn reconstruct(decoded: &DecodedStrokes, smooth: bool) -> Reconstruction {
    let paths: Vec<BezPath> = decoded
        .sub_paths
        .iter()
        .map(|points| {
            if smooth {
                smooth::catmull_rom(points)
            } else {
                smooth::polyline(points)
            }
        })
        .collect();

    let frame = paths
        .iter()
        .filter(|path| path.elements().len() > 1)
        .map(|path| path.bounding_box())
        .fold(decoded.bounds, |frame, rect| {
            Some(frame.map_or(rect, |frame| frame.union(rect)))
        });

    Reconstruction { paths, frame }
}
