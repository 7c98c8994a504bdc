//! Configuration for the layout and scene pipeline.
//!
//! All geometry is in drawing units (pixels at 100% zoom). Text size is
//! estimated, not measured: `char_width` and `line_height` stand in for real
//! font metrics.

use crate::syntax::types::Direction;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Average glyph advance used to estimate label width.
    pub char_width: f64,
    /// Vertical distance between label lines.
    pub line_height: f64,
    pub font_size: f64,
    /// Horizontal padding inside a node around its label.
    pub node_padding_x: f64,
    /// Vertical padding inside a node around its label.
    pub node_padding_y: f64,
    pub min_node_width: f64,
    pub min_node_height: f64,
    /// Gap between neighbouring nodes in one flowchart rank.
    pub node_gap: f64,
    /// Gap between consecutive flowchart ranks.
    pub rank_gap: f64,
    /// Padding between a subgraph border and its members.
    pub subgraph_padding: f64,
    /// Extra room above subgraph members for the subgraph title.
    pub subgraph_label_height: f64,
    /// Gap between sequence participant columns.
    pub column_gap: f64,
    /// Vertical distance between sequence messages.
    pub message_spacing: f64,
    /// Gap between cells of the ER grid.
    pub grid_gap: f64,
    pub grid_max_columns: usize,
    /// Lateral shift applied to ER edges, cycled as `0, -offset, +offset`.
    pub edge_offset: f64,
    /// Distance kept between an arrow tip and the shape it binds to.
    pub binding_gap: f64,
    /// Overrides the flowchart header direction when set.
    pub direction_override: Option<Direction>,
    /// Seed for element identities and rendering seeds.
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            char_width: 9.0,
            line_height: 25.0,
            font_size: 20.0,
            node_padding_x: 20.0,
            node_padding_y: 15.0,
            min_node_width: 120.0,
            min_node_height: 60.0,
            node_gap: 60.0,
            rank_gap: 100.0,
            subgraph_padding: 30.0,
            subgraph_label_height: 30.0,
            column_gap: 80.0,
            message_spacing: 60.0,
            grid_gap: 120.0,
            grid_max_columns: 4,
            edge_offset: 12.0,
            binding_gap: 8.0,
            direction_override: None,
            seed: 1,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimated `(width, height)` of a possibly multi-line text block.
    pub fn text_size(&self, text: &str) -> (f64, f64) {
        let lines = text.split('\n');
        let (count, longest) = lines.fold((0usize, 0usize), |(count, longest), line| {
            (count + 1, longest.max(line.chars().count()))
        });
        #[allow(clippy::cast_precision_loss)]
        let size = (longest as f64 * self.char_width, count as f64 * self.line_height);
        size
    }
}
