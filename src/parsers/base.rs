//! Parser trait, shared line helpers and the `Cursor` tokenizer.
//!
//! Every dialect grammar is line oriented: the parsers walk
//! [`significant_lines`] and classify each line on its own. The flowchart
//! grammar needs character-level scanning inside a line (shape brackets,
//! edge chains), which is what [`Cursor`] provides.

use crate::style::StyleResolver;
use crate::syntax::types::{ArrowHead, Diagram, Direction, LineStyle, NodeShape};

// ─── Parser trait ────────────────────────────────────────────────────────────

/// Trait for diagram parsers.
///
/// Input is directive-free text whose first significant line is the header.
/// Parsers never fail: lines they do not recognize are skipped.
pub trait Parser {
    fn parse(&self, body: &str, resolver: StyleResolver<'_>) -> Diagram;
}

// ─── Line helpers ────────────────────────────────────────────────────────────

/// Trimmed, non-empty lines that are not `%%` comments.
pub fn significant_lines(src: &str) -> impl Iterator<Item = &str> {
    src.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("%%"))
}

/// Header keywords that open a flowchart. `flowchart-elk` selects a layout
/// engine upstream; here it reads as a plain flowchart.
pub const FLOWCHART_KEYWORDS: [&str; 3] = ["flowchart", "flowchart-elk", "graph"];

/// Split a header line at the first space or `;` into keyword and rest.
pub fn split_header(line: &str) -> (&str, &str) {
    let is_break = |c: char| c.is_whitespace() || c == ';';
    let end = line.find(is_break).unwrap_or(line.len());
    (&line[..end], line[end..].trim_start_matches(is_break))
}

pub fn is_flowchart_keyword(keyword: &str) -> bool {
    FLOWCHART_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(keyword))
}

/// Strip a keyword prefix (case-insensitive, whole word) and return the rest.
pub fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let head = line.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &line[keyword.len()..];
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Remove one pair of matching surrounding quotes.
pub fn unquote(s: &str) -> &str {
    let s = s.trim();
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Turn `<br>` variants into line breaks.
pub fn normalize_breaks(label: &str) -> String {
    label
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("<br>", "\n")
}

// ─── Edge patterns ───────────────────────────────────────────────────────────

/// How a flowchart connector token is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connector {
    pub start_head: ArrowHead,
    pub end_head: ArrowHead,
    pub line_style: LineStyle,
}

const fn connector(start_head: ArrowHead, end_head: ArrowHead, line_style: LineStyle) -> Connector {
    Connector {
        start_head,
        end_head,
        line_style,
    }
}

/// Edge connector tokens in priority order (longest-match first).
pub const EDGE_PATTERNS: &[(&str, Connector)] = &[
    ("<-.->", connector(ArrowHead::Closed, ArrowHead::Closed, LineStyle::Dashed)),
    ("<==>", connector(ArrowHead::Closed, ArrowHead::Closed, LineStyle::Thick)),
    ("<-->", connector(ArrowHead::Closed, ArrowHead::Closed, LineStyle::Solid)),
    ("-.->", connector(ArrowHead::None, ArrowHead::Closed, LineStyle::Dashed)),
    ("==>", connector(ArrowHead::None, ArrowHead::Closed, LineStyle::Thick)),
    ("-->", connector(ArrowHead::None, ArrowHead::Closed, LineStyle::Solid)),
    ("--o", connector(ArrowHead::None, ArrowHead::Dot, LineStyle::Solid)),
    ("--x", connector(ArrowHead::None, ArrowHead::Cross, LineStyle::Solid)),
    ("-.-", connector(ArrowHead::None, ArrowHead::None, LineStyle::Dashed)),
    ("===", connector(ArrowHead::None, ArrowHead::None, LineStyle::Thick)),
    ("---", connector(ArrowHead::None, ArrowHead::None, LineStyle::Solid)),
];

/// `-- text -->` style labels: opener, then each closer with the connector it stands for.
const INLINE_LABEL_FORMS: &[(&str, &[(&str, &str)])] = &[
    ("--", &[("-->", "-->"), ("---", "---")]),
    ("-.", &[(".->", "-.->"), (".-", "-.-")]),
    ("==", &[("==>", "==>"), ("===", "===")]),
];

fn connector_for(token: &str) -> Option<Connector> {
    EDGE_PATTERNS
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, c)| *c)
}

// ─── Cursor (stateful tokenizer) ─────────────────────────────────────────────

/// Stateful parser cursor over one line of input.
pub struct Cursor {
    pub src: Vec<char>,
    pub pos: usize,
}

impl Cursor {
    pub fn new(src: &str) -> Self {
        Self {
            src: src.chars().collect(),
            pos: 0,
        }
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Peek whether the next chars match the given string.
    pub fn peek(&self, s: &str) -> bool {
        let mut i = self.pos;
        for ch in s.chars() {
            if i >= self.src.len() || self.src[i] != ch {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Consume `s` if it matches; returns true if consumed.
    pub fn consume(&mut self, s: &str) -> bool {
        if self.peek(s) {
            self.pos += s.chars().count();
            true
        } else {
            false
        }
    }

    /// Skip spaces, tabs and a trailing `;` statement separator.
    pub fn skip_ws(&mut self) {
        while self.pos < self.src.len() && matches!(self.src[self.pos], ' ' | '\t' | ';') {
            self.pos += 1;
        }
    }

    fn is_id_char(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_'
    }

    /// Match a node identifier: `[A-Za-z0-9_]+` with inner single hyphens (`my-node`).
    ///
    /// A hyphen is only part of the id when an id character follows it, so
    /// `A-->B` splits into `A`, `-->`, `B`.
    pub fn match_node_id(&mut self) -> Option<String> {
        if self.eof() || !Self::is_id_char(self.src[self.pos]) {
            return None;
        }
        let start = self.pos;
        self.pos += 1;
        while self.pos < self.src.len() {
            let c = self.src[self.pos];
            let hyphen_joins = c == '-'
                && self
                    .src
                    .get(self.pos + 1)
                    .is_some_and(|next| Self::is_id_char(*next));
            if Self::is_id_char(c) || hyphen_joins {
                self.pos += 1;
            } else {
                break;
            }
        }
        Some(self.src[start..self.pos].iter().collect())
    }

    /// Match a direction keyword: `TD`, `TB`, `LR`, `RL`, `BT`.
    pub fn match_direction(&mut self) -> Option<Direction> {
        let start = self.pos;
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_alphabetic() {
            self.pos += 1;
        }
        let word: String = self.src[start..self.pos].iter().collect();
        let dir = Direction::from_token(&word);
        if dir.is_none() {
            self.pos = start;
        }
        dir
    }

    /// Parse a double-quoted string, handling `\n`, `\"`, `\\` escapes.
    pub fn parse_quoted_string(&mut self) -> String {
        // Caller must have verified src[pos] == '"'
        self.pos += 1;
        let mut buf = String::new();
        while self.pos < self.src.len() {
            let ch = self.src[self.pos];
            if ch == '"' {
                self.pos += 1;
                break;
            }
            if ch == '\\' && self.pos + 1 < self.src.len() {
                let nxt = self.src[self.pos + 1];
                match nxt {
                    'n' => buf.push('\n'),
                    other => buf.push(other),
                }
                self.pos += 2;
            } else {
                buf.push(ch);
                self.pos += 1;
            }
        }
        buf
    }

    /// Parse a label up to (not including) `closer`, quoted or bare.
    pub fn parse_node_label(&mut self, closer: &str) -> String {
        self.skip_ws();
        if self.pos < self.src.len() && self.src[self.pos] == '"' {
            let label = self.parse_quoted_string();
            self.skip_ws();
            return normalize_breaks(&label);
        }
        let start = self.pos;
        while !self.eof() && !self.peek(closer) {
            self.pos += 1;
        }
        let label: String = self.src[start..self.pos].iter().collect();
        normalize_breaks(label.trim())
    }

    /// Try to parse a node shape bracket. Returns `(NodeShape, label)` or None.
    ///
    /// Delimiters are tried most specific first: `((` before `(`, `([` before `[`.
    pub fn parse_node_shape(&mut self) -> Option<(NodeShape, String)> {
        const SHAPES: &[(&str, &str, NodeShape)] = &[
            ("((", "))", NodeShape::Ellipse),
            ("([", "])", NodeShape::Stadium),
            ("[(", ")]", NodeShape::Cylinder),
            ("{{", "}}", NodeShape::Hexagon),
            ("[[", "]]", NodeShape::Rectangle),
            ("(", ")", NodeShape::Stadium),
            ("{", "}", NodeShape::Diamond),
            ("[", "]", NodeShape::Rectangle),
            (">", "]", NodeShape::Rectangle),
        ];
        for (open, close, shape) in SHAPES {
            if self.consume(open) {
                let label = self.parse_node_label(close);
                self.consume(close);
                return Some((*shape, label));
            }
        }
        None
    }

    /// Parse a node reference (id + optional shape bracket).
    pub fn parse_node_ref(&mut self) -> Option<NodeRef> {
        self.skip_ws();
        let id = self.match_node_id()?;
        let shape = self.parse_node_shape();
        Some(NodeRef { id, shape })
    }

    /// Try to parse an edge connector token.
    pub fn parse_edge_connector(&mut self) -> Option<Connector> {
        self.skip_ws();
        for (token, conn) in EDGE_PATTERNS {
            if self.consume(token) {
                return Some(*conn);
            }
        }
        None
    }

    /// Try to parse an edge label `|text|`. Returns label text or None.
    pub fn try_parse_edge_label(&mut self) -> Option<String> {
        self.skip_ws();
        if !self.consume("|") {
            return None;
        }
        let start = self.pos;
        while self.pos < self.src.len() && self.src[self.pos] != '|' {
            self.pos += 1;
        }
        let text: String = self.src[start..self.pos].iter().collect();
        self.consume("|");
        Some(normalize_breaks(unquote(&text)))
    }

    /// Try to parse `-- text -->` (and the dotted / thick variants).
    pub fn try_parse_inline_label(&mut self) -> Option<(Connector, String)> {
        self.skip_ws();
        let saved = self.pos;
        for (opener, closers) in INLINE_LABEL_FORMS {
            let spaced = self
                .src
                .get(self.pos + 2)
                .is_some_and(|c| c.is_whitespace());
            if !self.peek(opener) || !spaced {
                continue;
            }
            self.pos += 2;
            let start = self.pos;
            while !self.eof() {
                if let Some((closer, token)) = closers.iter().find(|(c, _)| self.peek(c)) {
                    let text: String = self.src[start..self.pos].iter().collect();
                    self.pos += closer.chars().count();
                    let conn = connector_for(token)?;
                    return Some((conn, normalize_breaks(unquote(&text))));
                }
                self.pos += 1;
            }
            self.pos = saved;
        }
        None
    }

    /// Parse an edge chain: `connector [label] target [connector [label] target ...]`.
    pub fn parse_edge_chain(&mut self) -> Vec<(Connector, Option<String>, NodeRef)> {
        let mut segments = Vec::new();
        loop {
            let saved = self.pos;
            let (conn, label) = if let Some(conn) = self.parse_edge_connector() {
                (conn, self.try_parse_edge_label())
            } else if let Some((conn, text)) = self.try_parse_inline_label() {
                (conn, Some(text))
            } else {
                self.pos = saved;
                break;
            };
            let Some(node) = self.parse_node_ref() else {
                self.pos = saved;
                break;
            };
            segments.push((conn, label.filter(|l| !l.is_empty()), node));
        }
        segments
    }
}

/// A node mention: the id plus an inline shape definition when one was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub id: String,
    pub shape: Option<(NodeShape, String)>,
}

// ─── Tests ───────────────────────────────────────────────────────────────────
