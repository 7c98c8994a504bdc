//! Dialect-neutral AST and the directive block that rides along with it.

pub mod directive;
pub mod types;

pub use directive::{extract_directive, strip_directive};
pub use types::{
    ArrowHead, Diagram, Dialect, Direction, Edge, LineStyle, Node, NodeShape, StyleCategory,
    StyleDirective, Subgraph,
};
