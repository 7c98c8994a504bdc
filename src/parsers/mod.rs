//! Parser registry: detect the diagram dialect and dispatch to its parser.

pub mod base;
pub mod er;
pub mod flowchart;
pub mod sequence;

pub use base::Parser;

use tracing::debug;

use crate::error::ConvertError;
use crate::style::StyleResolver;
use crate::syntax::directive::{extract_directive, strip_directive};
use crate::syntax::types::{Diagram, Dialect};
use base::{is_flowchart_keyword, significant_lines, split_header};
use er::ErParser;
use flowchart::FlowchartParser;
use sequence::SequenceParser;

fn first_significant_line(src: &str) -> Option<&str> {
    significant_lines(src).next()
}

/// Classify text by its header keyword, ignoring any directive block.
///
/// Returns `None` when no known header starts the text.
pub fn detect_dialect(src: &str) -> Option<Dialect> {
    let body = strip_directive(src);
    let header = first_significant_line(&body)?;
    let (keyword, _) = split_header(header);
    if is_flowchart_keyword(keyword) {
        return Some(Dialect::Flowchart);
    }
    match keyword.to_ascii_lowercase().as_str() {
        "sequencediagram" => Some(Dialect::Sequence),
        "erdiagram" => Some(Dialect::EntityRelationship),
        _ => None,
    }
}

/// Parse Mermaid text into a [`Diagram`].
///
/// Extracts the directive, detects the dialect and dispatches to the matching
/// parser. The returned diagram carries the directive and the original text.
///
/// # Errors
///
/// [`ConvertError::UnrecognizedDialect`] when no dialect header is found.
pub fn parse(src: &str) -> Result<Diagram, ConvertError> {
    let directive = extract_directive(src);
    let body = strip_directive(src);
    let Some(dialect) = detect_dialect(&body) else {
        let header = first_significant_line(&body).unwrap_or_default().to_string();
        return Err(ConvertError::UnrecognizedDialect { header });
    };

    let resolver = StyleResolver::new(&directive);
    let mut diagram = match dialect {
        Dialect::Flowchart => FlowchartParser.parse(&body, resolver),
        Dialect::Sequence => SequenceParser.parse(&body, resolver),
        Dialect::EntityRelationship => ErParser.parse(&body, resolver),
    };
    debug!(
        %dialect,
        nodes = diagram.nodes.len(),
        edges = diagram.edges.len(),
        subgraphs = diagram.subgraphs.len(),
        overrides = directive.overrides.len(),
        "parse: diagram built"
    );
    diagram.directive = directive;
    diagram.source = src.to_string();
    Ok(diagram)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
