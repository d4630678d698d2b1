//! Curve-based drawing documents.
//!
//! A `Document` is a tree of groups and paths, the shape an SVG import
//! leaves behind. Paths carry the flags the stroke pipeline cares about:
//! whether they are a clip mask and whether they are visible.

use kurbo::{Affine, BezPath, Point};

use crate::error::{SketchError, SketchResult};

/// A drawing: the children of an implicit root group.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub children: Vec<Node>,
}

/// One element of the drawing tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// A container. Its children are visited in order.
    Group(Vec<Node>),
    /// A drawable path element.
    Path(PathItem),
    /// Any other element (text, images). Never stroked, but its children
    /// are still visited.
    Other(Vec<Node>),
}

/// A path element with its curve data.
#[derive(Debug, Clone)]
pub struct PathItem {
    /// Absolute-coordinate curve data. May hold several sub-paths.
    pub path: BezPath,
    /// True when the path only defines a clipping region.
    pub clip_mask: bool,
    pub visible: bool,
}

impl PathItem {
    pub fn new(path: BezPath) -> Self {
        Self {
            path,
            clip_mask: false,
            visible: true,
        }
    }

    pub fn clip_mask(path: BezPath) -> Self {
        Self {
            clip_mask: true,
            ..Self::new(path)
        }
    }

    /// Whether this element contributes strokes.
    pub fn is_drawable(&self) -> bool {
        self.visible && !self.clip_mask
    }
}

impl Node {
    pub fn path(path: BezPath) -> Self {
        Node::Path(PathItem::new(path))
    }

    fn children(&self) -> &[Node] {
        match self {
            Node::Group(children) | Node::Other(children) => children,
            Node::Path(_) => &[],
        }
    }
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Drawable paths in depth-first pre-order.
    ///
    /// Uses an explicit stack so deeply nested documents cannot overflow.
    pub fn drawable_paths(&self) -> DrawablePaths<'_> {
        DrawablePaths {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Parse SVG markup. Shapes become paths with transforms applied;
    /// clip paths are kept as clip-mask paths ahead of the content they clip.
    pub fn from_svg(text: &str) -> SketchResult<Self> {
        let options = usvg::Options::default();
        let tree = usvg::Tree::from_str(text, &options)
            .map_err(|e| SketchError::SvgParse(e.to_string()))?;
        Ok(Self {
            children: convert_group(tree.root()),
        })
    }
}

/// Iterator over the drawable paths of a document.
pub struct DrawablePaths<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for DrawablePaths<'a> {
    type Item = &'a PathItem;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            self.stack.extend(node.children().iter().rev());
            if let Node::Path(item) = node {
                if item.is_drawable() {
                    return Some(item);
                }
            }
        }
        None
    }
}

// ── usvg conversion ──────────────────────────────────────

fn convert_group(group: &usvg::Group) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(group.children().len() + 1);

    if let Some(clip) = group.clip_path() {
        nodes.push(Node::Group(mark_clip_masks(convert_group(clip.root()))));
    }

    for child in group.children() {
        match child {
            usvg::Node::Group(inner) => nodes.push(Node::Group(convert_group(inner))),
            usvg::Node::Path(path) => {
                let mut bez = convert_path_data(path.data());
                bez.apply_affine(to_affine(path.abs_transform()));
                nodes.push(Node::Path(PathItem {
                    path: bez,
                    clip_mask: false,
                    visible: path.is_visible(),
                }));
            }
            usvg::Node::Image(_) | usvg::Node::Text(_) => nodes.push(Node::Other(Vec::new())),
        }
    }
    nodes
}

fn mark_clip_masks(nodes: Vec<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .map(|node| match node {
            Node::Path(item) => Node::Path(PathItem {
                clip_mask: true,
                ..item
            }),
            Node::Group(children) => Node::Group(mark_clip_masks(children)),
            Node::Other(children) => Node::Other(mark_clip_masks(children)),
        })
        .collect()
}

fn convert_path_data(data: &usvg::tiny_skia_path::Path) -> BezPath {
    use usvg::tiny_skia_path::PathSegment;

    let pt = |p: usvg::tiny_skia_path::Point| Point::new(p.x as f64, p.y as f64);
    let mut bez = BezPath::new();
    for segment in data.segments() {
        match segment {
            PathSegment::MoveTo(p) => bez.move_to(pt(p)),
            PathSegment::LineTo(p) => bez.line_to(pt(p)),
            PathSegment::QuadTo(c, p) => bez.quad_to(pt(c), pt(p)),
            PathSegment::CubicTo(c1, c2, p) => bez.curve_to(pt(c1), pt(c2), pt(p)),
            PathSegment::Close => bez.close_path(),
        }
    }
    bez
}

fn to_affine(t: usvg::tiny_skia_path::Transform) -> Affine {
    Affine::new([
        t.sx as f64,
        t.ky as f64,
        t.kx as f64,
        t.sy as f64,
        t.tx as f64,
        t.ty as f64,
    ])
}
