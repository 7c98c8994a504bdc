//! Line parser for Mermaid `sequenceDiagram`.
//!
//! Participants become nodes in first-appearance order, whether they were
//! declared with `participant` / `actor` or only used in a message. Messages
//! become edges in declaration order.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::style::StyleResolver;
use crate::syntax::types::{
    ArrowHead, Diagram, Dialect, Edge, LineStyle, Node, NodeShape, StyleCategory,
};

use super::base::{Parser, significant_lines, strip_keyword, unquote};

static MESSAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s*(-->>|->>|-->|->|--x|-x|--\)|-\))([+-]?)\s*([^:]+?)\s*(?::\s*(.*))?$")
        .expect("valid message regex")
});

/// Control-flow and annotation lines that draw nothing.
const IGNORED_KEYWORDS: &[&str] = &[
    "note", "loop", "alt", "else", "opt", "par", "and", "critical", "option", "break", "rect",
    "end", "autonumber", "title", "box", "destroy", "create",
];

// ─── Statements ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantKind {
    Participant,
    Actor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub from: String,
    pub to: String,
    pub text: String,
    pub head: ArrowHead,
    pub line_style: LineStyle,
}

/// One recognized sequence line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Declare {
        id: String,
        alias: Option<String>,
        kind: ParticipantKind,
    },
    /// `activate X` / `deactivate X`: registers X but draws nothing.
    Mention(String),
    Message(Message),
}

/// Map an arrow token to its head and line style.
fn arrow_style(token: &str) -> (ArrowHead, LineStyle) {
    match token {
        "->>" => (ArrowHead::Closed, LineStyle::Solid),
        "-->>" => (ArrowHead::Closed, LineStyle::Dashed),
        "->" | "-)" => (ArrowHead::Open, LineStyle::Solid),
        "-->" | "--)" => (ArrowHead::Open, LineStyle::Dashed),
        "-x" => (ArrowHead::Cross, LineStyle::Solid),
        _ => (ArrowHead::Cross, LineStyle::Dashed),
    }
}

/// Classify a single trimmed line. `None` means the line is ignored.
pub fn parse_line(line: &str) -> Option<Statement> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("sequenceDiagram") {
        return None;
    }
    for (keyword, kind) in [
        ("participant", ParticipantKind::Participant),
        ("actor", ParticipantKind::Actor),
    ] {
        if let Some(rest) = strip_keyword(line, keyword) {
            return parse_declaration(rest, kind);
        }
    }
    for keyword in ["activate", "deactivate"] {
        if let Some(rest) = strip_keyword(line, keyword) {
            return (!rest.is_empty()).then(|| Statement::Mention(rest.to_string()));
        }
    }
    if IGNORED_KEYWORDS.iter().any(|kw| strip_keyword(line, kw).is_some()) {
        return None;
    }

    let caps = MESSAGE_RE.captures(line)?;
    let from = caps[1].trim();
    let to = caps[4].trim();
    if from.is_empty() || to.is_empty() {
        return None;
    }
    let (head, line_style) = arrow_style(&caps[2]);
    let text = caps.get(5).map_or("", |m| m.as_str().trim());
    Some(Statement::Message(Message {
        from: from.to_string(),
        to: to.to_string(),
        text: text.to_string(),
        head,
        line_style,
    }))
}

fn parse_declaration(rest: &str, kind: ParticipantKind) -> Option<Statement> {
    let (id, alias) = match rest.split_once(" as ") {
        Some((id, alias)) => (id.trim(), Some(unquote(alias).to_string())),
        None => (rest.trim(), None),
    };
    if id.is_empty() {
        return None;
    }
    Some(Statement::Declare {
        id: id.to_string(),
        alias,
        kind,
    })
}

// ─── Parser ──────────────────────────────────────────────────────────────────

pub struct SequenceParser;

impl Parser for SequenceParser {
    fn parse(&self, body: &str, resolver: StyleResolver<'_>) -> Diagram {
        let mut diagram = Diagram::new(Dialect::Sequence, "");
        let mut actors: Vec<String> = Vec::new();

        for line in significant_lines(body) {
            let Some(stmt) = parse_line(line) else {
                trace!(line, "sequence: ignoring line");
                continue;
            };
            match stmt {
                Statement::Declare { id, alias, kind } => {
                    let node = ensure_participant(&mut diagram.nodes, &id);
                    if let Some(alias) = alias {
                        node.label = alias;
                    }
                    if kind == ParticipantKind::Actor {
                        node.shape = NodeShape::Ellipse;
                        actors.push(id);
                    }
                }
                Statement::Mention(id) => {
                    ensure_participant(&mut diagram.nodes, &id);
                }
                Statement::Message(msg) => {
                    ensure_participant(&mut diagram.nodes, &msg.from);
                    ensure_participant(&mut diagram.nodes, &msg.to);
                    let mut edge = Edge::new(msg.from, msg.to);
                    edge.end_head = msg.head;
                    edge.line_style = Some(msg.line_style);
                    if !msg.text.is_empty() {
                        edge.label = Some(msg.text);
                    }
                    diagram.edges.push(edge);
                }
            }
        }

        for node in &mut diagram.nodes {
            let is_actor = actors.contains(&node.id);
            node.style = resolver
                .resolve(&node.id, &node.label, node.shape)
                .or(is_actor.then_some(StyleCategory::User));
        }
        diagram
    }
}

/// Register a participant at first use and return it.
fn ensure_participant<'a>(nodes: &'a mut Vec<Node>, id: &str) -> &'a mut Node {
    let idx = match nodes.iter().position(|n| n.id == id) {
        Some(idx) => idx,
        None => {
            nodes.push(Node::bare(id));
            nodes.len() - 1
        }
    };
    &mut nodes[idx]
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::types::StyleDirective;

    fn parse(src: &str) -> Diagram {
        let directive = StyleDirective::new();
        SequenceParser.parse(src, StyleResolver::new(&directive))
    }

    fn ids(d: &Diagram) -> Vec<&str> {
        d.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_client_api_scenario() {
        let d = parse("sequenceDiagram\n Client->>API: Request\n API-->>Client: Response");
        assert_eq!(ids(&d), vec!["Client", "API"]);
        assert_eq!(d.edges.len(), 2);
        assert_eq!(d.edges[0].label.as_deref(), Some("Request"));
        assert_eq!(d.edges[0].line_style, Some(LineStyle::Solid));
        assert!(d.edges[1].is_dashed());
        assert_eq!(d.edges[1].end_head, ArrowHead::Closed);
    }

    #[test]
    fn test_all_arrow_tokens() {
        let cases = [
            ("A->>B: x", ArrowHead::Closed, LineStyle::Solid),
            ("A-->>B: x", ArrowHead::Closed, LineStyle::Dashed),
            ("A->B: x", ArrowHead::Open, LineStyle::Solid),
            ("A-->B: x", ArrowHead::Open, LineStyle::Dashed),
            ("A-xB: x", ArrowHead::Cross, LineStyle::Solid),
            ("A--xB: x", ArrowHead::Cross, LineStyle::Dashed),
            ("A-)B: x", ArrowHead::Open, LineStyle::Solid),
        ];
        for (line, head, style) in cases {
            let Some(Statement::Message(m)) = parse_line(line) else {
                panic!("no message in {line}");
            };
            assert_eq!((m.from.as_str(), m.to.as_str()), ("A", "B"), "{line}");
            assert_eq!(m.head, head, "{line}");
            assert_eq!(m.line_style, style, "{line}");
        }
    }

    #[test]
    fn test_message_without_text_and_activation_marker() {
        let Some(Statement::Message(m)) = parse_line("Alice ->>+ John") else {
            panic!("expected message");
        };
        assert_eq!(m.from, "Alice");
        assert_eq!(m.to, "John");
        assert!(m.text.is_empty());
    }

    #[test]
    fn test_explicit_declarations_keep_first_appearance_order() {
        let src = "sequenceDiagram\n participant B as Backend\n A->>B: call\n actor U as Person\n U->>A: click\n participant A as Frontend";
        let d = parse(src);
        assert_eq!(ids(&d), vec!["B", "A", "U"]);
        assert_eq!(d.node("B").unwrap().label, "Backend");
        assert_eq!(d.node("A").unwrap().label, "Frontend");
        assert_eq!(d.node("U").unwrap().shape, NodeShape::Ellipse);
    }

    #[test]
    fn test_actor_defaults_to_user_category() {
        let d = parse("sequenceDiagram\n actor Bob\n Bob->>Cart: add");
        assert_eq!(d.node("Bob").unwrap().style, Some(StyleCategory::User));
        assert_eq!(d.node("Cart").unwrap().style, None);
    }

    #[test]
    fn test_control_lines_ignored() {
        let src = "sequenceDiagram\n autonumber\n loop Every minute\n A->>B: ping\n end\n Note over A,B: hi -> there\n activate C";
        let d = parse(src);
        assert_eq!(d.edges.len(), 1);
        assert_eq!(ids(&d), vec!["A", "B", "C"]);
    }
}
