//! Layout engine: one independent algorithm per dialect.
//!
//! Dispatch by dialect:
//!   flowchart → rank layout ([`flowchart`])
//!   sequence  → timeline layout ([`sequence`])
//!   ER        → grid layout ([`er`])

pub mod er;
pub mod flowchart;
pub mod graph;
pub mod routing;
pub mod sequence;
pub mod types;

pub use types::{LayoutNode, LayoutResult, LayoutSubgraph, Lifeline, Point, Rect, RoutedEdge};

use tracing::debug;

use crate::config::RenderConfig;
use crate::syntax::types::{Diagram, Dialect, Node, NodeShape};

/// Diamonds and ellipses grow by this factor so the label fits the
/// inscribed area.
const INSCRIBED_SCALE: f64 = 1.4;

/// Estimated `(width, height)` of a node box.
pub fn node_size(node: &Node, cfg: &RenderConfig) -> (f64, f64) {
    let (tw, th) = cfg.text_size(&node.label);
    let w = (tw + 2.0 * cfg.node_padding_x).max(cfg.min_node_width);
    let h = (th + 2.0 * cfg.node_padding_y).max(cfg.min_node_height);
    match node.shape {
        NodeShape::Diamond | NodeShape::Ellipse => (w * INSCRIBED_SCALE, h * INSCRIBED_SCALE),
        _ => (w, h),
    }
}

/// Compute absolute geometry for `diagram`.
///
/// `cfg.direction_override` replaces the header direction for flowcharts
/// and is ignored by the other dialects.
pub fn layout(diagram: &Diagram, cfg: &RenderConfig) -> LayoutResult {
    let result = match diagram.dialect {
        Dialect::Flowchart => {
            let direction = cfg.direction_override.unwrap_or(diagram.direction);
            flowchart::layout_flowchart(diagram, direction, cfg)
        }
        Dialect::Sequence => sequence::layout_sequence(diagram, cfg),
        Dialect::EntityRelationship => er::layout_er(diagram, cfg),
    };
    debug!(
        dialect = %diagram.dialect,
        width = result.width,
        height = result.height,
        routed = result.edges.iter().filter(|e| e.is_drawable()).count(),
        "layout: geometry computed"
    );
    result
}

// ─── Tests ───────────────────────────────────────────────────────────────────
