//! Semantic style resolution shared by the parsers and the scene synthesizer.

pub mod resolver;

pub use resolver::{StyleResolver, category_for_label, category_for_shape, resolve_style};
