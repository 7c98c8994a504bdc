//! Rank layout for flowcharts.
//!
//! 1. Rank every node by longest path from the roots (see [`GraphIR::ranks`]).
//! 2. Group nodes into one row per rank, keeping diagram order inside a row.
//! 3. Center each row on the widest row; stack rows along the rank axis.
//! 4. Mirror the rank axis for BT / RL.
//! 5. Wrap subgraph members in a padded box drawn as an overlay.
//! 6. Route edges between facing sides.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::RenderConfig;
use crate::syntax::types::{Diagram, Direction};

use super::graph::GraphIR;
use super::node_size;
use super::routing::{route_between, self_loop};
use super::types::{LayoutNode, LayoutResult, LayoutSubgraph, Rect, RoutedEdge};

/// Lay out a flowchart in `direction`.
pub fn layout_flowchart(diagram: &Diagram, direction: Direction, cfg: &RenderConfig) -> LayoutResult {
    let ir = GraphIR::from_diagram(diagram);
    let ranks = ir.ranks();
    debug!(
        nodes = ir.node_count(),
        edges = ir.edge_count(),
        acyclic = ir.is_dag(),
        "flowchart: ranks computed"
    );

    // rank → [(node index, width, height)]
    let mut rows: BTreeMap<usize, Vec<(usize, f64, f64)>> = BTreeMap::new();
    for (i, node) in diagram.nodes.iter().enumerate() {
        let rank = ranks.get(&node.id).copied().unwrap_or(0);
        let (w, h) = node_size(node, cfg);
        rows.entry(rank).or_default().push((i, w, h));
    }

    let horizontal = direction.is_horizontal();
    // Cross extent runs along a row, depth along the rank axis.
    let cross = |w: f64, h: f64| if horizontal { h } else { w };
    let depth = |w: f64, h: f64| if horizontal { w } else { h };

    let row_cross: Vec<f64> = rows
        .values()
        .map(|row| {
            let sum: f64 = row.iter().map(|&(_, w, h)| cross(w, h)).sum();
            sum + cfg.node_gap * row.len().saturating_sub(1) as f64
        })
        .collect();
    let widest = row_cross.iter().copied().fold(0.0_f64, f64::max);
    let row_depth: Vec<f64> = rows
        .values()
        .map(|row| row.iter().map(|&(_, w, h)| depth(w, h)).fold(0.0_f64, f64::max))
        .collect();
    let total_depth: f64 =
        row_depth.iter().sum::<f64>() + cfg.rank_gap * row_depth.len().saturating_sub(1) as f64;

    let margin = if diagram.subgraphs.is_empty() {
        0.0
    } else {
        cfg.subgraph_padding + cfg.subgraph_label_height
    };

    let mut placed: Vec<Option<LayoutNode>> = vec![None; diagram.nodes.len()];
    let mut depth_cursor = 0.0;
    for (row_idx, (&rank, row)) in rows.iter().enumerate() {
        let row_d = row_depth[row_idx];
        let mut cross_cursor = (widest - row_cross[row_idx]) / 2.0;
        for (order, &(i, w, h)) in row.iter().enumerate() {
            let c = cross(w, h);
            let d = depth(w, h);
            let mut along = depth_cursor + (row_d - d) / 2.0;
            if direction.is_reversed() {
                along = total_depth - along - d;
            }
            let rect = if horizontal {
                Rect::new(margin + along, margin + cross_cursor, w, h)
            } else {
                Rect::new(margin + cross_cursor, margin + along, w, h)
            };
            placed[i] = Some(LayoutNode::new(diagram.nodes[i].id.clone(), rank, order, rect));
            cross_cursor += c + cfg.node_gap;
        }
        depth_cursor += row_d + cfg.rank_gap;
    }

    let mut result = LayoutResult::new();
    result.nodes = placed.into_iter().flatten().collect();
    result.subgraphs = diagram
        .subgraphs
        .iter()
        .map(|sg| LayoutSubgraph {
            id: sg.id.clone(),
            label: sg.label.clone(),
            rect: subgraph_box(&result, &sg.members, cfg),
        })
        .collect();
    result.edges = diagram
        .edges
        .iter()
        .map(|edge| {
            let waypoints = match (result.node(&edge.from_id), result.node(&edge.to_id)) {
                (Some(a), _) if edge.is_self_loop() => self_loop(&a.rect),
                (Some(a), Some(b)) => route_between(&a.rect, &b.rect, 0.0),
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
    result.compute_extent();
    result
}

/// Padded union of member rectangles; a zero box when no member was placed.
fn subgraph_box(result: &LayoutResult, members: &[String], cfg: &RenderConfig) -> Rect {
    let Some(bounds) = members
        .iter()
        .filter_map(|id| result.node(id))
        .map(|n| n.rect)
        .reduce(|acc, r| acc.union(&r))
    else {
        return Rect::new(0.0, 0.0, 0.0, 0.0);
    };
    let pad = cfg.subgraph_padding;
    let top = pad + cfg.subgraph_label_height;
    Rect::new(
        bounds.x - pad,
        bounds.y - top,
        bounds.width + 2.0 * pad,
        bounds.height + top + pad,
    )
}

// ─── Tests ───────────────────────────────────────────────────────────────────
