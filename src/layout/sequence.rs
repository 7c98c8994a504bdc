//! Timeline layout for sequence diagrams.
//!
//! Participants sit in one header row in first-appearance order. Message `i`
//! is a horizontal segment at `header + (i + 1) * message_spacing` between the
//! two column centers. Lifelines run from each header box to one row past the
//! last message.

use crate::config::RenderConfig;
use crate::syntax::types::Diagram;

use super::node_size;
use super::types::{LayoutNode, LayoutResult, Lifeline, Point, Rect, RoutedEdge};

/// Horizontal reach of a message sent to its own participant.
const SELF_MESSAGE_REACH: f64 = 40.0;

pub fn layout_sequence(diagram: &Diagram, cfg: &RenderConfig) -> LayoutResult {
    let sizes: Vec<(f64, f64)> = diagram.nodes.iter().map(|n| node_size(n, cfg)).collect();
    let header = sizes.iter().map(|&(_, h)| h).fold(0.0_f64, f64::max);

    let mut result = LayoutResult::new();
    let mut x = 0.0;
    for (order, (node, &(w, _))) in diagram.nodes.iter().zip(&sizes).enumerate() {
        result
            .nodes
            .push(LayoutNode::new(node.id.clone(), 0, order, Rect::new(x, 0.0, w, header)));
        x += w + cfg.column_gap;
    }

    let row_y = |i: usize| header + (i + 1) as f64 * cfg.message_spacing;
    result.edges = diagram
        .edges
        .iter()
        .enumerate()
        .map(|(i, edge)| {
            let y = row_y(i);
            let waypoints = match (result.node(&edge.from_id), result.node(&edge.to_id)) {
                (Some(a), _) if edge.is_self_loop() => {
                    let cx = a.rect.center().x;
                    let drop = cfg.message_spacing / 2.0;
                    vec![
                        Point::new(cx, y),
                        Point::new(cx + SELF_MESSAGE_REACH, y),
                        Point::new(cx + SELF_MESSAGE_REACH, y + drop),
                        Point::new(cx, y + drop),
                    ]
                }
                (Some(a), Some(b)) => {
                    vec![Point::new(a.rect.center().x, y), Point::new(b.rect.center().x, y)]
                }
                _ => Vec::new(),
            };
            RoutedEdge {
                from_id: edge.from_id.clone(),
                to_id: edge.to_id.clone(),
                label: edge.label.clone(),
                line_style: edge.line_style,
                start_head: edge.start_head,
                end_head: edge.end_head,
                waypoints,
            }
        })
        .collect();

    let bottom = row_y(diagram.edges.len());
    result.lifelines = result
        .nodes
        .iter()
        .map(|n| Lifeline {
            node_id: n.id.clone(),
            x: n.rect.center().x,
            top: n.rect.bottom(),
            bottom,
        })
        .collect();
    result.compute_extent();
    result
}

// ─── Tests ───────────────────────────────────────────────────────────────────
