//! Raster preview of a reconstruction.
//!
//! Converts kurbo BezPaths to tiny-skia paths and strokes them onto a
//! white canvas framed like the SVG output.

use kurbo::{BezPath, PathEl, Rect};

use crate::config::SketchConfig;
use crate::error::{SketchError, SketchResult};
use crate::Reconstruction;

/// Convert a kurbo `BezPath` to a `tiny_skia::Path`.
fn kurbo_to_tinyskia(bezpath: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for el in bezpath.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Encode a pixmap to PNG bytes.
fn encode_png(pixmap: &tiny_skia::Pixmap) -> SketchResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|e| SketchError::Render(e.to_string()))?;
    writer
        .write_image_data(pixmap.data())
        .map_err(|e| SketchError::Render(e.to_string()))?;
    drop(writer);
    Ok(buf)
}

/// Rasterize the drawing to PNG bytes.
///
/// The longer side of the frame maps to `size` pixels, with `padding`
/// pixels of margin on every side.
pub fn render_png(
    drawing: &Reconstruction,
    config: &SketchConfig,
    size: u32,
    padding: u32,
) -> SketchResult<Vec<u8>> {
    let frame = drawing.frame.unwrap_or(Rect::ZERO);
    let extent = frame.width().max(frame.height()).max(1.0);
    let scale = size as f64 / extent;
    let width = (frame.width() * scale).ceil() as u32 + padding * 2;
    let height = (frame.height() * scale).ceil() as u32 + padding * 2;

    let mut pixmap = tiny_skia::Pixmap::new(width.max(1), height.max(1))
        .ok_or_else(|| SketchError::Render(format!("cannot allocate {}x{} pixmap", width, height)))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let [r, g, b] = config.stroke_color;
    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = true;

    let stroke = tiny_skia::Stroke {
        width: (config.stroke_width * scale).max(1.0) as f32,
        line_cap: tiny_skia::LineCap::Round,
        line_join: tiny_skia::LineJoin::Round,
        ..tiny_skia::Stroke::default()
    };

    let transform = tiny_skia::Transform::from_row(
        scale as f32,
        0.0,
        0.0,
        scale as f32,
        (padding as f64 - frame.x0 * scale) as f32,
        (padding as f64 - frame.y0 * scale) as f32,
    );

    for path in &drawing.paths {
        if let Some(sk_path) = kurbo_to_tinyskia(path) {
            pixmap.stroke_path(&sk_path, &paint, &stroke, transform, None);
        }
    }

    encode_png(&pixmap)
}
