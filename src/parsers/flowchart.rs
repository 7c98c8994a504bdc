//! Line parser for Mermaid `flowchart` / `graph` diagrams.
//!
//! Each line is classified on its own by [`parse_line`]; the parser then
//! folds the statements into a [`Diagram`], tracking subgraph depth so that
//! nested blocks are flattened into their outermost parent.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::style::StyleResolver;
use crate::syntax::types::{Diagram, Dialect, Direction, Edge, Node, Subgraph};

use super::base::{
    Cursor, NodeRef, Parser, is_flowchart_keyword, significant_lines, split_header, strip_keyword, unquote,
};

static SUBGRAPH_ID_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_-]+)\s*\[(.*)\]$").expect("valid subgraph header regex")
});

/// Keywords whose lines carry styling or interaction we do not model.
const IGNORED_KEYWORDS: &[&str] = &["classDef", "class", "style", "linkStyle", "click", "direction"];

// ─── Statements ──────────────────────────────────────────────────────────────

/// One recognized flowchart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Header(Direction),
    SubgraphStart { id: String, label: String },
    SubgraphEnd,
    /// Every node mentioned on the line plus the edges between them.
    Edges { refs: Vec<NodeRef>, edges: Vec<Edge> },
    Node(NodeRef),
}

/// Classify a single trimmed line. `None` means the line is ignored.
pub fn parse_line(line: &str) -> Option<Statement> {
    let line = line.trim().trim_end_matches(';').trim_end();
    if line.is_empty() {
        return None;
    }
    if let Some(direction) = parse_header(line) {
        return Some(Statement::Header(direction));
    }
    if line.eq_ignore_ascii_case("end") {
        return Some(Statement::SubgraphEnd);
    }
    if let Some(rest) = strip_keyword(line, "subgraph") {
        return Some(parse_subgraph_header(rest));
    }
    if IGNORED_KEYWORDS.iter().any(|kw| strip_keyword(line, kw).is_some()) {
        return None;
    }

    let mut cursor = Cursor::new(line);
    let source = cursor.parse_node_ref()?;
    let segments = cursor.parse_edge_chain();
    if segments.is_empty() {
        cursor.skip_ws();
        // Trailing text means this was not a clean node definition.
        return cursor.eof().then_some(Statement::Node(source));
    }

    let mut refs = vec![source];
    let mut edges = Vec::with_capacity(segments.len());
    for (conn, label, target) in segments {
        let from = refs.last().map(|r| r.id.clone()).unwrap_or_default();
        let mut edge = Edge::new(from, target.id.clone());
        edge.label = label;
        edge.start_head = conn.start_head;
        edge.end_head = conn.end_head;
        edge.line_style = Some(conn.line_style);
        edges.push(edge);
        refs.push(target);
    }
    Some(Statement::Edges { refs, edges })
}

/// `flowchart TD` / `graph LR`. Missing or unknown direction defaults to top-down.
fn parse_header(line: &str) -> Option<Direction> {
    let (keyword, rest) = split_header(line);
    if !is_flowchart_keyword(keyword) {
        return None;
    }
    let mut cursor = Cursor::new(rest);
    Some(cursor.match_direction().unwrap_or_default())
}

fn parse_subgraph_header(rest: &str) -> Statement {
    if let Some(caps) = SUBGRAPH_ID_LABEL_RE.captures(rest) {
        return Statement::SubgraphStart {
            id: caps[1].to_string(),
            label: unquote(&caps[2]).to_string(),
        };
    }
    let title = unquote(rest).to_string();
    Statement::SubgraphStart {
        id: title.clone(),
        label: title,
    }
}

// ─── Parser ──────────────────────────────────────────────────────────────────

pub struct FlowchartParser;

impl Parser for FlowchartParser {
    fn parse(&self, body: &str, resolver: StyleResolver<'_>) -> Diagram {
        let mut diagram = Diagram::new(Dialect::Flowchart, "");
        let mut depth = 0usize;
        let mut open: Option<usize> = None;
        let mut header_seen = false;

        for line in significant_lines(body) {
            let Some(stmt) = parse_line(line) else {
                trace!(line, "flowchart: ignoring line");
                continue;
            };
            match stmt {
                Statement::Header(direction) => {
                    if !header_seen {
                        diagram.direction = direction;
                        header_seen = true;
                    }
                }
                Statement::SubgraphStart { id, label } => {
                    depth += 1;
                    if depth == 1 {
                        diagram.subgraphs.push(Subgraph::new(id, label));
                        open = Some(diagram.subgraphs.len() - 1);
                    }
                }
                Statement::SubgraphEnd => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        open = None;
                    }
                }
                Statement::Edges { refs, edges } => {
                    for r in &refs {
                        upsert_node(&mut diagram.nodes, r);
                        if let Some(idx) = open {
                            diagram.subgraphs[idx].add_member(&r.id);
                        }
                    }
                    diagram.edges.extend(edges);
                }
                Statement::Node(r) => {
                    upsert_node(&mut diagram.nodes, &r);
                    if let Some(idx) = open {
                        diagram.subgraphs[idx].add_member(&r.id);
                    }
                }
            }
        }

        for node in &mut diagram.nodes {
            node.style = resolver.resolve(&node.id, &node.label, node.shape);
        }
        for sg in &mut diagram.subgraphs {
            sg.style = resolver.override_for(&sg.id);
        }
        diagram
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Insert on first mention; an inline shape definition updates label and shape.
///
/// A later bare mention never resets an explicit definition.
pub fn upsert_node(nodes: &mut Vec<Node>, r: &NodeRef) {
    match nodes.iter_mut().find(|n| n.id == r.id) {
        Some(existing) => {
            if let Some((shape, label)) = &r.shape {
                existing.shape = *shape;
                existing.label.clone_from(label);
            }
        }
        None => {
            let node = match &r.shape {
                Some((shape, label)) => Node::new(r.id.clone(), label.clone(), *shape),
                None => Node::bare(r.id.clone()),
            };
            nodes.push(node);
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
