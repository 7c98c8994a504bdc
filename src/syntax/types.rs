//! AST data structures shared by every diagram dialect.
//!
//! Each dialect parser produces the same [`Diagram`] shape: an ordered node
//! list, an edge list, a subgraph list and the style directive, plus the
//! untouched source text. Enums here (`Dialect`, `Direction`, `NodeShape`,
//! `ArrowHead`, `LineStyle`, `StyleCategory`) are the fixed vocabularies the
//! later stages match on.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ─── Dialect ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Flowchart,
    Sequence,
    EntityRelationship,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Flowchart => "flowchart",
            Self::Sequence => "sequence",
            Self::EntityRelationship => "entity-relationship",
        };
        f.write_str(name)
    }
}

// ─── Direction ───────────────────────────────────────────────────────────────

/// Layout direction. Only meaningful for flowcharts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    TD,
    TB,
    BT,
    LR,
    RL,
}

impl Direction {
    /// True when ranks advance along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LR | Self::RL)
    }

    /// True when the rank axis runs against the coordinate axis.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::BT | Self::RL)
    }

    /// Parse a direction token (case-insensitive).
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "TD" => Some(Self::TD),
            "TB" => Some(Self::TB),
            "BT" => Some(Self::BT),
            "LR" => Some(Self::LR),
            "RL" => Some(Self::RL),
            _ => None,
        }
    }
}

// ─── NodeShape ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeShape {
    #[default]
    Rectangle, // id[Label]
    Cylinder, // id[(Label)]
    Stadium,  // id([Label]) or id(Label)
    Hexagon,  // id{{Label}}
    Ellipse,  // id((Label))
    Diamond,  // id{Label}
}

// ─── Edge styling ─────────────────────────────────────────────────────────────

/// Arrowhead drawn at one end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrowHead {
    #[default]
    None,
    /// Filled triangle (`->>`, `-->`).
    Closed,
    /// Open chevron (`->` in sequence diagrams).
    Open,
    /// Circle end (`--o`).
    Dot,
    /// Cross / bar end (`--x`).
    Cross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Thick,
}

// ─── StyleCategory ────────────────────────────────────────────────────────────

/// Semantic category driving the palette a node is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleCategory {
    Db,
    Cache,
    Queue,
    Service,
    Ui,
    Gateway,
    External,
    Ai,
    Storage,
    User,
    Orchestrator,
}

impl StyleCategory {
    pub const ALL: [Self; 11] = [
        Self::Db,
        Self::Cache,
        Self::Queue,
        Self::Service,
        Self::Ui,
        Self::Gateway,
        Self::External,
        Self::Ai,
        Self::Storage,
        Self::User,
        Self::Orchestrator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Db => "db",
            Self::Cache => "cache",
            Self::Queue => "queue",
            Self::Service => "service",
            Self::Ui => "ui",
            Self::Gateway => "gateway",
            Self::External => "external",
            Self::Ai => "ai",
            Self::Storage => "storage",
            Self::User => "user",
            Self::Orchestrator => "orchestrator",
        }
    }
}

impl fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a style token is not part of the category vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl FromStr for StyleCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "db" | "database" => Ok(Self::Db),
            "cache" => Ok(Self::Cache),
            "queue" => Ok(Self::Queue),
            "service" => Ok(Self::Service),
            "ui" | "frontend" => Ok(Self::Ui),
            "gateway" => Ok(Self::Gateway),
            "external" => Ok(Self::External),
            "ai" | "agent" => Ok(Self::Ai),
            "storage" => Ok(Self::Storage),
            "user" | "actor" => Ok(Self::User),
            "orchestrator" | "orchestration" => Ok(Self::Orchestrator),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

// ─── StyleDirective ───────────────────────────────────────────────────────────

/// Style overrides and theme pulled from a `%%{ ... }%%` block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleDirective {
    pub theme: Option<String>,
    /// Node or subgraph id → category. Only holds known categories.
    pub overrides: HashMap<String, StyleCategory>,
}

impl StyleDirective {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn override_for(&self, id: &str) -> Option<StyleCategory> {
        self.overrides.get(id).copied()
    }
}

// ─── Node ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Identifier, unique within one diagram. Join key for layout and synthesis.
    pub id: String,
    /// Display label; lines are separated by `\n`.
    pub label: String,
    pub shape: NodeShape,
    pub style: Option<StyleCategory>,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, shape: NodeShape) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shape,
            style: None,
        }
    }

    /// Create a bare node (id = label, default Rectangle shape).
    pub fn bare(id: impl Into<String>) -> Self {
        let id = id.into();
        let label = id.clone();
        Self::new(id, label, NodeShape::Rectangle)
    }

    pub fn is_multiline(&self) -> bool {
        self.label.contains('\n')
    }
}

// ─── Edge ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from_id: String,
    pub to_id: String,
    pub label: Option<String>,
    pub start_head: ArrowHead,
    pub end_head: ArrowHead,
    pub line_style: Option<LineStyle>,
}

impl Edge {
    /// Solid edge with a closed head at the target.
    pub fn new(from_id: impl Into<String>, to_id: impl Into<String>) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            label: None,
            start_head: ArrowHead::None,
            end_head: ArrowHead::Closed,
            line_style: None,
        }
    }

    pub fn is_dashed(&self) -> bool {
        self.line_style == Some(LineStyle::Dashed)
    }

    pub fn is_self_loop(&self) -> bool {
        self.from_id == self.to_id
    }
}

// ─── Subgraph ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subgraph {
    pub id: String,
    pub label: String,
    /// Member node ids in first-reference order, without duplicates.
    pub members: Vec<String>,
    pub style: Option<StyleCategory>,
}

impl Subgraph {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            members: Vec::new(),
            style: None,
        }
    }

    pub fn add_member(&mut self, id: &str) {
        if !self.members.iter().any(|m| m == id) {
            self.members.push(id.to_string());
        }
    }
}

// ─── Diagram (top-level AST) ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    pub dialect: Dialect,
    pub direction: Direction,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub subgraphs: Vec<Subgraph>,
    pub directive: StyleDirective,
    /// Original input, carried through unmodified.
    pub source: String,
}

impl Diagram {
    pub fn new(dialect: Dialect, source: impl Into<String>) -> Self {
        Self {
            dialect,
            direction: Direction::default(),
            nodes: Vec::new(),
            edges: Vec::new(),
            subgraphs: Vec::new(),
            directive: StyleDirective::new(),
            source: source.into(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Edges whose endpoints both name a known node.
    pub fn resolved_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(|e| self.contains_node(&e.from_id) && self.contains_node(&e.to_id))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_default() {
        assert_eq!(Direction::default(), Direction::TD);
    }

    #[test]
    fn test_direction_tokens() {
        assert_eq!(Direction::from_token("lr"), Some(Direction::LR));
        assert_eq!(Direction::from_token("TB"), Some(Direction::TB));
        assert_eq!(Direction::from_token("XY"), None);
        assert!(Direction::RL.is_horizontal());
        assert!(Direction::RL.is_reversed());
        assert!(!Direction::TB.is_reversed());
    }

    #[test]
    fn test_node_bare() {
        let n = Node::bare("B");
        assert_eq!(n.id, "B");
        assert_eq!(n.label, "B");
        assert_eq!(n.shape, NodeShape::Rectangle);
        assert!(n.style.is_none());
    }

    #[test]
    fn test_node_multiline() {
        let n = Node::new("U", "USER\nint id PK", NodeShape::Rectangle);
        assert!(n.is_multiline());
        assert!(!Node::bare("USER").is_multiline());
    }

    #[test]
    fn test_edge_defaults() {
        let e = Edge::new("A", "B");
        assert_eq!(e.end_head, ArrowHead::Closed);
        assert_eq!(e.start_head, ArrowHead::None);
        assert!(!e.is_dashed());
        assert!(e.label.is_none());
    }

    #[test]
    fn test_category_aliases() {
        assert_eq!("database".parse::<StyleCategory>(), Ok(StyleCategory::Db));
        assert_eq!("UI".parse::<StyleCategory>(), Ok(StyleCategory::Ui));
        assert!("banana".parse::<StyleCategory>().is_err());
        for cat in StyleCategory::ALL {
            assert_eq!(cat.as_str().parse::<StyleCategory>(), Ok(cat));
        }
    }

    #[test]
    fn test_subgraph_members_dedup() {
        let mut sg = Subgraph::new("g", "Group");
        sg.add_member("A");
        sg.add_member("B");
        sg.add_member("A");
        assert_eq!(sg.members, vec!["A", "B"]);
    }

    #[test]
    fn test_resolved_edges_skips_dangling() {
        let mut d = Diagram::new(Dialect::Flowchart, "");
        d.nodes.push(Node::bare("A"));
        d.nodes.push(Node::bare("B"));
        d.edges.push(Edge::new("A", "B"));
        d.edges.push(Edge::new("A", "Ghost"));
        assert_eq!(d.resolved_edges().count(), 1);
    }
}
