//! Serializable scene primitives handed to a document writer.
//!
//! Field names follow whiteboard-document conventions (camelCase, a `type`
//! tag per element, linear points relative to the element origin).

use serde::Serialize;

// ─── Element body ────────────────────────────────────────────────────────────

/// Type-specific part of an element, serialized inline with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementBody {
    Rectangle {},
    Ellipse {},
    Diamond {},
    Line {
        points: Vec<[f64; 2]>,
    },
    #[serde(rename_all = "camelCase")]
    Arrow {
        points: Vec<[f64; 2]>,
        start_binding: Option<Binding>,
        end_binding: Option<Binding>,
        start_arrowhead: Option<&'static str>,
        end_arrowhead: Option<&'static str>,
    },
    #[serde(rename_all = "camelCase")]
    Text {
        text: String,
        original_text: String,
        font_size: f64,
        font_family: u8,
        text_align: &'static str,
        vertical_align: &'static str,
        line_height: f64,
        container_id: Option<String>,
    },
}

impl ElementBody {
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementBody::Rectangle {} => "rectangle",
            ElementBody::Ellipse {} => "ellipse",
            ElementBody::Diamond {} => "diamond",
            ElementBody::Line { .. } => "line",
            ElementBody::Arrow { .. } => "arrow",
            ElementBody::Text { .. } => "text",
        }
    }
}

// ─── Bindings ────────────────────────────────────────────────────────────────

/// One end of an arrow attached to a shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub element_id: String,
    pub focus: f64,
    pub gap: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundKind {
    Arrow,
    Text,
}

/// Back-reference from a shape to an arrow or text bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundRef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BoundKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Roundness {
    #[serde(rename = "type")]
    pub kind: u8,
}

// ─── Role ────────────────────────────────────────────────────────────────────

/// What an element stands for in the diagram. Not serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    SubgraphFrame,
    SubgraphLabel,
    #[default]
    Shape,
    NodeLabel,
    Separator,
    Lifeline,
    Connector,
    ConnectorLabel,
}

// ─── Element ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    #[serde(flatten)]
    pub body: ElementBody,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
    pub stroke_color: String,
    pub background_color: String,
    pub fill_style: &'static str,
    pub stroke_width: f64,
    pub stroke_style: &'static str,
    pub roughness: u8,
    pub opacity: u8,
    pub roundness: Option<Roundness>,
    pub seed: u32,
    pub version: u32,
    pub version_nonce: u32,
    pub is_deleted: bool,
    pub group_ids: Vec<String>,
    pub bound_elements: Vec<BoundRef>,
    /// Z-order token; lexicographic order equals emission order.
    pub index: String,
    #[serde(skip)]
    pub role: Role,
    /// Diagram id (node or subgraph) this element was drawn for.
    #[serde(skip)]
    pub owner: Option<String>,
}

impl Element {
    pub fn is_arrow(&self) -> bool {
        matches!(self.body, ElementBody::Arrow { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.body, ElementBody::Text { .. })
    }

    /// `(start, end)` bindings of an arrow; `(None, None)` for anything else.
    pub fn bindings(&self) -> (Option<&Binding>, Option<&Binding>) {
        match &self.body {
            ElementBody::Arrow {
                start_binding,
                end_binding,
                ..
            } => (start_binding.as_ref(), end_binding.as_ref()),
            _ => (None, None),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.body {
            ElementBody::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }
}

// ─── Scene ───────────────────────────────────────────────────────────────────

/// Text element summary for the document writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextDescriptor {
    pub id: String,
    pub text: String,
}

/// Finished scene: elements in z-order plus every text element's content.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Scene {
    pub elements: Vec<Element>,
    pub texts: Vec<TextDescriptor>,
}

impl Scene {
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.role == role)
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Element> {
        self.with_role(Role::Shape)
    }

    pub fn arrows(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.is_arrow())
    }

    /// The shape drawn for diagram node `node_id`.
    pub fn shape_for(&self, node_id: &str) -> Option<&Element> {
        self.shapes().find(|e| e.owner.as_deref() == Some(node_id))
    }
}
