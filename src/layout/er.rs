//! Grid layout for entity-relationship diagrams.
//!
//! Entities fill a grid row by row in declaration order. The column count is
//! `ceil(sqrt(n))` capped at `grid_max_columns`; a column is as wide as its
//! widest entity and a row as tall as its tallest.

use crate::config::RenderConfig;
use crate::syntax::types::Diagram;

use super::node_size;
use super::routing::{lateral_offset, route_between, self_loop};
use super::types::{LayoutNode, LayoutResult, Rect, RoutedEdge};

/// Number of grid columns for `n` entities.
pub fn grid_columns(n: usize, max_columns: usize) -> usize {
    let mut cols = 1;
    while cols * cols < n {
        cols += 1;
    }
    cols.min(max_columns.max(1))
}

pub fn layout_er(diagram: &Diagram, cfg: &RenderConfig) -> LayoutResult {
    let n = diagram.nodes.len();
    let cols = grid_columns(n, cfg.grid_max_columns);
    let rows = n.div_ceil(cols);
    let sizes: Vec<(f64, f64)> = diagram.nodes.iter().map(|node| node_size(node, cfg)).collect();

    let mut col_width = vec![0.0_f64; cols];
    let mut row_height = vec![0.0_f64; rows];
    for (i, &(w, h)) in sizes.iter().enumerate() {
        col_width[i % cols] = col_width[i % cols].max(w);
        row_height[i / cols] = row_height[i / cols].max(h);
    }
    let col_x: Vec<f64> = col_width
        .iter()
        .scan(0.0, |x, &w| {
            let here = *x;
            *x += w + cfg.grid_gap;
            Some(here)
        })
        .collect();
    let row_y: Vec<f64> = row_height
        .iter()
        .scan(0.0, |y, &h| {
            let here = *y;
            *y += h + cfg.grid_gap;
            Some(here)
        })
        .collect();

    let mut result = LayoutResult::new();
    for (i, (node, &(w, h))) in diagram.nodes.iter().zip(&sizes).enumerate() {
        let (row, col) = (i / cols, i % cols);
        let x = col_x[col] + (col_width[col] - w) / 2.0;
        result
            .nodes
            .push(LayoutNode::new(node.id.clone(), row, col, Rect::new(x, row_y[row], w, h)));
    }

    result.edges = diagram
        .edges
        .iter()
        .enumerate()
        .map(|(i, edge)| {
            let waypoints = match (result.node(&edge.from_id), result.node(&edge.to_id)) {
                (Some(a), _) if edge.is_self_loop() => self_loop(&a.rect),
                (Some(a), Some(b)) => {
                    route_between(&a.rect, &b.rect, lateral_offset(i, cfg.edge_offset))
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
    result.compute_extent();
    result
}

// ─── Tests ───────────────────────────────────────────────────────────────────
