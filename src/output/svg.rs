use std::fmt::Write;

use kurbo::{Rect, Size};

use crate::config::SketchConfig;
use crate::Reconstruction;

/// Serialize a reconstruction as a standalone SVG document.
///
/// All sub-paths go into one group carrying the stroke style. The view box
/// is the drawing's frame; a frame thinner than one unit is widened around
/// its center so the document stays renderable.
pub fn to_svg(drawing: &Reconstruction, config: &SketchConfig) -> String {
    let view = view_box(drawing.frame);
    let [r, g, b] = config.stroke_color;

    let mut svg = String::with_capacity(256 + drawing.paths.len() * 128);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\">",
        view.width(),
        view.height(),
        view.x0,
        view.y0,
        view.width(),
        view.height(),
    );
    let _ = write!(
        svg,
        "<g fill=\"none\" stroke=\"#{:02x}{:02x}{:02x}\" stroke-width=\"{}\">",
        r, g, b, config.stroke_width,
    );
    for path in &drawing.paths {
        let _ = write!(svg, "<path d=\"{}\"/>", path.to_svg());
    }
    svg.push_str("</g></svg>");
    svg
}

fn view_box(frame: Option<Rect>) -> Rect {
    let frame = frame.unwrap_or(Rect::ZERO);
    let size = Size::new(frame.width().max(1.0), frame.height().max(1.0));
    Rect::from_center_size(frame.center(), size)
}
