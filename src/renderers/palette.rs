//! Color table per style category.

use crate::syntax::types::StyleCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub stroke: &'static str,
    pub background: &'static str,
}

const NEUTRAL: Palette = Palette {
    stroke: "#1e1e1e",
    background: "#ffffff",
};

const TABLE: &[(StyleCategory, Palette)] = &[
    (StyleCategory::Db, Palette { stroke: "#1971c2", background: "#a5d8ff" }),
    (StyleCategory::Cache, Palette { stroke: "#e8590c", background: "#ffd8a8" }),
    (StyleCategory::Queue, Palette { stroke: "#f08c00", background: "#ffec99" }),
    (StyleCategory::Service, Palette { stroke: "#2f9e44", background: "#b2f2bb" }),
    (StyleCategory::Ui, Palette { stroke: "#6741d9", background: "#d0bfff" }),
    (StyleCategory::Gateway, Palette { stroke: "#0c8599", background: "#99e9f2" }),
    (StyleCategory::External, Palette { stroke: "#868e96", background: "#e9ecef" }),
    (StyleCategory::Ai, Palette { stroke: "#c2255c", background: "#fcc2d7" }),
    (StyleCategory::Storage, Palette { stroke: "#5c940d", background: "#d8f5a2" }),
    (StyleCategory::User, Palette { stroke: "#364fc7", background: "#bac8ff" }),
    (StyleCategory::Orchestrator, Palette { stroke: "#9c36b5", background: "#eebefa" }),
];

/// Colors for `category`, or the neutral pair when there is none.
pub fn palette_for(category: Option<StyleCategory>) -> Palette {
    category
        .and_then(|c| TABLE.iter().find(|(k, _)| *k == c).map(|(_, p)| *p))
        .unwrap_or(NEUTRAL)
}

/// Stroke used for lifelines and uncategorized connectors.
pub const CONNECTOR_STROKE: &str = "#495057";
