//! Layout types: Point, Rect, LayoutNode, RoutedEdge, LayoutSubgraph, LayoutResult.

use crate::syntax::types::{ArrowHead, LineStyle};

// ─── Point ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ─── Rect ────────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in absolute drawing coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(x, y, self.right().max(other.right()) - x, self.bottom().max(other.bottom()) - y)
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

// ─── LayoutNode ───────────────────────────────────────────────────────────────

/// A node with computed position and size.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    /// Flowchart rank, grid row for ER, 0 for sequence.
    pub rank: usize,
    /// Position inside its rank / row / participant order.
    pub order: usize,
    pub rect: Rect,
}

impl LayoutNode {
    pub fn new(id: impl Into<String>, rank: usize, order: usize, rect: Rect) -> Self {
        Self {
            id: id.into(),
            rank,
            order,
            rect,
        }
    }
}

// ─── RoutedEdge ───────────────────────────────────────────────────────────────

/// An edge with its waypoints. Fewer than two waypoints means "do not draw".
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEdge {
    pub from_id: String,
    pub to_id: String,
    pub label: Option<String>,
    pub line_style: Option<LineStyle>,
    pub start_head: ArrowHead,
    pub end_head: ArrowHead,
    pub waypoints: Vec<Point>,
}

impl RoutedEdge {
    pub fn is_drawable(&self) -> bool {
        self.waypoints.len() >= 2
    }
}

// ─── LayoutSubgraph ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSubgraph {
    pub id: String,
    pub label: String,
    pub rect: Rect,
}

// ─── Lifeline ─────────────────────────────────────────────────────────────────

/// Vertical guide under a sequence participant.
#[derive(Debug, Clone, PartialEq)]
pub struct Lifeline {
    pub node_id: String,
    pub x: f64,
    pub top: f64,
    pub bottom: f64,
}

// ─── LayoutResult ─────────────────────────────────────────────────────────────

/// The full output of the layout pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutResult {
    /// Same order as the diagram's nodes.
    pub nodes: Vec<LayoutNode>,
    /// Same order as the diagram's edges.
    pub edges: Vec<RoutedEdge>,
    pub subgraphs: Vec<LayoutSubgraph>,
    pub lifelines: Vec<Lifeline>,
    pub width: f64,
    pub height: f64,
}

impl LayoutResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Record the overall extent from every placed rectangle.
    pub fn compute_extent(&mut self) {
        let rects = self
            .nodes
            .iter()
            .map(|n| n.rect)
            .chain(self.subgraphs.iter().map(|s| s.rect));
        let (w, h) = rects.fold((0.0_f64, 0.0_f64), |(w, h), r| (w.max(r.right()), h.max(r.bottom())));
        let lifeline_bottom = self.lifelines.iter().fold(0.0_f64, |acc, l| acc.max(l.bottom));
        self.width = w;
        self.height = h.max(lifeline_bottom);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
