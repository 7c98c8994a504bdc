//! Line parser for Mermaid `erDiagram`.
//!
//! Two constructs are recognized: relationship lines
//! (`CUSTOMER ||--o{ ORDER : places`) and attribute blocks
//! (`CUSTOMER { string name PK }`). Entities seen only in relationships are
//! still registered, with no attributes.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::style::StyleResolver;
use crate::syntax::types::{
    ArrowHead, Diagram, Dialect, Edge, LineStyle, Node, NodeShape, StyleCategory,
};

use super::base::{Parser, significant_lines, unquote};

const CARDINALITY: &str = r"\|\||\|o|o\||\}\||\|\{|\}o|o\{|\}|\{";

static RELATIONSHIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^([A-Za-z0-9_-]+)\s*({CARDINALITY})(--|\.\.)({CARDINALITY})\s*([A-Za-z0-9_-]+)\s*(?::\s*(.*))?$"
    ))
    .expect("valid relationship regex")
});

/// Looser `A -- B : label` form, tried only after [`RELATIONSHIP_RE`].
static SIMPLE_RELATIONSHIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_-]+)\s*(-{2,}|\.{2,})\s*([A-Za-z0-9_-]+)\s*(?::\s*(.*))?$")
        .expect("valid simple relationship regex")
});

static BLOCK_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([A-Za-z0-9_-]+)\s*(?:\[\s*"?([^"\]]*)"?\s*\])?\s*\{\s*(\})?$"#)
        .expect("valid block regex")
});

static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^([A-Za-z0-9_()\[\],.<>*-]+)\s+([A-Za-z0-9_*-]+)((?:\s*,?\s*(?:PK|FK|UK))*)\s*(?:"[^"]*")?$"#,
    )
    .expect("valid attribute regex")
});

static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PK|FK|UK").expect("valid key regex"));

// ─── Model ───────────────────────────────────────────────────────────────────

/// Human-readable ratio for one cardinality symbol.
pub fn cardinality_ratio(symbol: &str) -> &'static str {
    match symbol {
        "||" => "1",
        "|o" | "o|" => "0..1",
        "}o" | "o{" => "0..n",
        _ => "n",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub ty: String,
    pub name: String,
    pub keys: Vec<String>,
}

impl Attribute {
    /// `type name PK, FK`
    pub fn display(&self) -> String {
        if self.keys.is_empty() {
            format!("{} {}", self.ty, self.name)
        } else {
            format!("{} {} {}", self.ty, self.name, self.keys.join(", "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub left: String,
    pub right: String,
    /// Cardinality symbols, absent for the simple form.
    pub cardinality: Option<(String, String)>,
    pub identifying: bool,
    pub label: Option<String>,
}

impl Relationship {
    /// Explicit label, else `left:right` ratio text.
    pub fn edge_label(&self) -> Option<String> {
        self.label.clone().or_else(|| {
            self.cardinality
                .as_ref()
                .map(|(l, r)| format!("{}:{}", cardinality_ratio(l), cardinality_ratio(r)))
        })
    }
}

/// One recognized ER line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Relationship(Relationship),
    /// `closed` is true for the one-line `NAME { }` form.
    BlockOpen {
        id: String,
        alias: Option<String>,
        closed: bool,
    },
    BlockClose,
    Attribute(Attribute),
}

fn explicit_label(raw: Option<regex::Match<'_>>) -> Option<String> {
    raw.map(|m| unquote(m.as_str()).trim().to_string())
        .filter(|l| !l.is_empty())
}

/// Classify a line outside an attribute block.
pub fn parse_line(line: &str) -> Option<Statement> {
    let line = line.trim();
    if let Some(caps) = RELATIONSHIP_RE.captures(line) {
        return Some(Statement::Relationship(Relationship {
            left: caps[1].to_string(),
            right: caps[5].to_string(),
            cardinality: Some((caps[2].to_string(), caps[4].to_string())),
            identifying: &caps[3] == "--",
            label: explicit_label(caps.get(6)),
        }));
    }
    if let Some(caps) = SIMPLE_RELATIONSHIP_RE.captures(line) {
        return Some(Statement::Relationship(Relationship {
            left: caps[1].to_string(),
            right: caps[3].to_string(),
            cardinality: None,
            identifying: caps[2].starts_with('-'),
            label: explicit_label(caps.get(4)),
        }));
    }
    if let Some(caps) = BLOCK_OPEN_RE.captures(line) {
        return Some(Statement::BlockOpen {
            id: caps[1].to_string(),
            alias: caps
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .filter(|a| !a.is_empty()),
            closed: caps.get(3).is_some(),
        });
    }
    None
}

/// Classify a line inside an attribute block.
pub fn parse_block_line(line: &str) -> Option<Statement> {
    let line = line.trim();
    if line == "}" {
        return Some(Statement::BlockClose);
    }
    let caps = ATTRIBUTE_RE.captures(line)?;
    let keys = KEY_RE
        .find_iter(caps.get(3).map_or("", |m| m.as_str()))
        .map(|m| m.as_str().to_string())
        .collect();
    Some(Statement::Attribute(Attribute {
        ty: caps[1].to_string(),
        name: caps[2].to_string(),
        keys,
    }))
}

// ─── Parser ──────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct EntityDraft {
    id: String,
    display: Option<String>,
    attributes: Vec<Attribute>,
}

impl EntityDraft {
    fn name(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.id)
    }

    fn label(&self) -> String {
        let mut lines = vec![self.name().to_string()];
        lines.extend(self.attributes.iter().map(Attribute::display));
        lines.join("\n")
    }
}

fn ensure_entity(entities: &mut Vec<EntityDraft>, id: &str) -> usize {
    if let Some(idx) = entities.iter().position(|e| e.id == id) {
        return idx;
    }
    entities.push(EntityDraft {
        id: id.to_string(),
        display: None,
        attributes: Vec::new(),
    });
    entities.len() - 1
}

pub struct ErParser;

impl Parser for ErParser {
    fn parse(&self, body: &str, resolver: StyleResolver<'_>) -> Diagram {
        let mut diagram = Diagram::new(Dialect::EntityRelationship, "");
        let mut entities: Vec<EntityDraft> = Vec::new();
        let mut open_block: Option<usize> = None;

        for line in significant_lines(body) {
            if line.eq_ignore_ascii_case("erDiagram") {
                continue;
            }
            let stmt = match open_block {
                Some(_) => parse_block_line(line),
                None => parse_line(line),
            };
            match stmt {
                Some(Statement::Relationship(rel)) => {
                    ensure_entity(&mut entities, &rel.left);
                    ensure_entity(&mut entities, &rel.right);
                    let mut edge = Edge::new(rel.left.clone(), rel.right.clone());
                    edge.end_head = ArrowHead::None;
                    edge.line_style = Some(if rel.identifying {
                        LineStyle::Solid
                    } else {
                        LineStyle::Dashed
                    });
                    edge.label = rel.edge_label();
                    diagram.edges.push(edge);
                }
                Some(Statement::BlockOpen { id, alias, closed }) => {
                    let idx = ensure_entity(&mut entities, &id);
                    if alias.is_some() {
                        entities[idx].display = alias;
                    }
                    open_block = (!closed).then_some(idx);
                }
                Some(Statement::BlockClose) => open_block = None,
                Some(Statement::Attribute(attr)) => {
                    if let Some(idx) = open_block {
                        entities[idx].attributes.push(attr);
                    }
                }
                None => trace!(line, "er: ignoring line"),
            }
        }

        diagram.nodes = entities
            .iter()
            .map(|e| {
                let mut node = Node::new(e.id.clone(), e.label(), NodeShape::Rectangle);
                node.style = resolver
                    .resolve(&e.id, e.name(), NodeShape::Rectangle)
                    .or(Some(StyleCategory::Db));
                node
            })
            .collect();
        diagram
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
