//! mermaid-scene: Mermaid flowchart, sequence and ER syntax to a positioned,
//! styled drawing scene.
//!
//! Pipeline: directive block → dialect detection → dialect parser (with style
//! resolution) → per-dialect layout → scene synthesis.
//!
//! Public API: [`convert`] / [`convert_with_config`].

pub mod config;
pub mod error;
pub mod layout;
pub mod parsers;
pub mod renderers;
pub mod style;
pub mod syntax;

pub use config::RenderConfig;
pub use error::ConvertError;
pub use parsers::{detect_dialect, parse};
pub use renderers::{Scene, synthesize};
pub use syntax::types::Diagram;

use tracing::debug;

/// A finished conversion: the parsed diagram and the scene drawn from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub diagram: Diagram,
    pub scene: Scene,
}

/// Convert Mermaid text into a scene using the default configuration.
///
/// # Errors
///
/// [`ConvertError::UnrecognizedDialect`] when the text has no known header.
pub fn convert(src: &str) -> Result<Conversion, ConvertError> {
    convert_with_config(src, &RenderConfig::default())
}

/// Convert Mermaid text into a scene.
///
/// # Errors
///
/// [`ConvertError::UnrecognizedDialect`] when the text has no known header.
pub fn convert_with_config(src: &str, config: &RenderConfig) -> Result<Conversion, ConvertError> {
    let diagram = parse(src)?;
    let layout_result = layout::layout(&diagram, config);
    let scene = synthesize(&diagram, &layout_result, config);
    debug!(
        dialect = %diagram.dialect,
        elements = scene.elements.len(),
        "convert: done"
    );
    Ok(Conversion { diagram, scene })
}
