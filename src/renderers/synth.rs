//! Scene synthesizer: turns a laid-out diagram into scene primitives.
//!
//! Emission order is the z-order:
//!   1. subgraph frames and their titles
//!   2. node shapes, each followed by its centered label (and, for ER
//!      entities with attributes, a separator under the title line)
//!   3. sequence lifelines
//!   4. arrows, each followed by its label
//!
//! Arrows carry their start/end bindings when created. Shapes only learn
//! about the arrows attached to them in [`reconcile_bindings`], which runs
//! once over the finished element list.

use std::collections::HashMap;

use tracing::debug;

use crate::config::RenderConfig;
use crate::layout::{LayoutResult, Lifeline, Point, Rect, RoutedEdge};
use crate::syntax::types::{ArrowHead, Diagram, Dialect, LineStyle, Node, NodeShape};

use super::ids::SceneIds;
use super::palette::{CONNECTOR_STROKE, palette_for};
use super::scene::{
    Binding, BoundKind, BoundRef, Element, ElementBody, Role, Roundness, Scene, TextDescriptor,
};

const TEXT_COLOR: &str = "#1e1e1e";
const TRANSPARENT: &str = "transparent";
/// Subgraph frames are drawn translucent.
const FRAME_OPACITY: u8 = 40;
/// Inset of a subgraph title from the frame's top-left corner.
const FRAME_TITLE_INSET: f64 = 10.0;
/// Gap between a sequence message line and the bottom of its label.
const MESSAGE_LABEL_LIFT: f64 = 4.0;

/// Build the scene for `diagram` laid out as `layout`.
pub fn synthesize(diagram: &Diagram, layout: &LayoutResult, cfg: &RenderConfig) -> Scene {
    let mut builder = SceneBuilder::new(cfg);
    builder.subgraphs(diagram, layout);
    builder.nodes(diagram, layout);
    builder.lifelines(&layout.lifelines);
    builder.edges(diagram.dialect, &layout.edges);

    let elements = reconcile_bindings(builder.elements);
    let texts = elements
        .iter()
        .filter_map(|e| {
            e.text().map(|text| TextDescriptor {
                id: e.id.clone(),
                text: text.to_string(),
            })
        })
        .collect();
    let scene = Scene { elements, texts };
    debug!(
        elements = scene.elements.len(),
        shapes = scene.shapes().count(),
        arrows = scene.arrows().count(),
        texts = scene.texts.len(),
        "synthesize: scene built"
    );
    scene
}

/// Attach to every shape a back-reference for each arrow bound to it.
///
/// Returns a corrected copy; arrows are left untouched. Running it twice
/// gives the same result.
pub fn reconcile_bindings(elements: Vec<Element>) -> Vec<Element> {
    let mut attached: HashMap<String, Vec<String>> = HashMap::new();
    for el in elements.iter().filter(|e| e.is_arrow()) {
        let (start, end) = el.bindings();
        for binding in [start, end].into_iter().flatten() {
            let arrows = attached.entry(binding.element_id.clone()).or_default();
            if !arrows.contains(&el.id) {
                arrows.push(el.id.clone());
            }
        }
    }

    elements
        .into_iter()
        .map(|mut el| {
            if let Some(arrows) = attached.get(&el.id) {
                for id in arrows {
                    if !el.bound_elements.iter().any(|r| &r.id == id) {
                        el.bound_elements.push(BoundRef {
                            id: id.clone(),
                            kind: BoundKind::Arrow,
                        });
                    }
                }
            }
            el
        })
        .collect()
}

// ─── Builder ─────────────────────────────────────────────────────────────────

struct SceneBuilder<'a> {
    cfg: &'a RenderConfig,
    ids: SceneIds,
    elements: Vec<Element>,
    /// node id → shape element id
    shape_ids: HashMap<String, String>,
}

impl<'a> SceneBuilder<'a> {
    fn new(cfg: &'a RenderConfig) -> Self {
        Self {
            cfg,
            ids: SceneIds::new(cfg.seed),
            elements: Vec::new(),
            shape_ids: HashMap::new(),
        }
    }

    /// A new element with default attributes. Ids and z-order are drawn here,
    /// so elements must be pushed in the order they are created.
    fn element(&mut self, body: ElementBody, rect: Rect, stroke: &str, background: &str, role: Role) -> Element {
        Element {
            id: self.ids.id(),
            body,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            angle: 0.0,
            stroke_color: stroke.to_string(),
            background_color: background.to_string(),
            fill_style: "solid",
            stroke_width: 2.0,
            stroke_style: "solid",
            roughness: 1,
            opacity: 100,
            roundness: None,
            seed: self.ids.seed(),
            version: 1,
            version_nonce: self.ids.seed(),
            is_deleted: false,
            group_ids: Vec::new(),
            bound_elements: Vec::new(),
            index: self.ids.index(),
            role,
            owner: None,
        }
    }

    fn text(&mut self, content: &str, rect: Rect, align: &'static str, container: Option<&str>, role: Role) -> Element {
        let body = ElementBody::Text {
            text: content.to_string(),
            original_text: content.to_string(),
            font_size: self.cfg.font_size,
            font_family: 1,
            text_align: align,
            vertical_align: if align == "center" { "middle" } else { "top" },
            line_height: self.cfg.line_height / self.cfg.font_size,
            container_id: container.map(str::to_string),
        };
        self.element(body, rect, TEXT_COLOR, TRANSPARENT, role)
    }

    /// Text box of `content` centered on `center`.
    fn centered(&self, content: &str, center: Point) -> Rect {
        let (w, h) = self.cfg.text_size(content);
        Rect::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    fn subgraphs(&mut self, diagram: &Diagram, layout: &LayoutResult) {
        for sg in &layout.subgraphs {
            if sg.rect.width <= 0.0 || sg.rect.height <= 0.0 {
                continue;
            }
            let style = diagram
                .subgraphs
                .iter()
                .find(|s| s.id == sg.id)
                .and_then(|s| s.style);
            let colors = palette_for(style);
            let mut frame = self.element(
                ElementBody::Rectangle {},
                sg.rect,
                colors.stroke,
                colors.background,
                Role::SubgraphFrame,
            );
            frame.opacity = FRAME_OPACITY;
            frame.owner = Some(sg.id.clone());
            self.elements.push(frame);

            let (w, h) = self.cfg.text_size(&sg.label);
            let title_rect = Rect::new(
                sg.rect.x + FRAME_TITLE_INSET,
                sg.rect.y + FRAME_TITLE_INSET,
                w,
                h,
            );
            let mut title = self.text(&sg.label, title_rect, "left", None, Role::SubgraphLabel);
            title.owner = Some(sg.id.clone());
            self.elements.push(title);
        }
    }

    fn nodes(&mut self, diagram: &Diagram, layout: &LayoutResult) {
        for placed in &layout.nodes {
            let Some(node) = diagram.node(&placed.id) else {
                continue;
            };
            let colors = palette_for(node.style);
            let mut shape = self.element(
                shape_body(node.shape),
                placed.rect,
                colors.stroke,
                colors.background,
                Role::Shape,
            );
            if node.shape == NodeShape::Stadium {
                shape.roundness = Some(Roundness { kind: 3 });
            }
            shape.owner = Some(node.id.clone());

            // Multi-line labels read top-down from the left edge; the vertical
            // position stays centered so the ER separator lines up.
            let mut label_rect = self.centered(&node.label, placed.rect.center());
            let align = if node.is_multiline() {
                label_rect.x = placed.rect.x + self.cfg.node_padding_x;
                "left"
            } else {
                "center"
            };
            let mut label = self.text(&node.label, label_rect, align, Some(shape.id.as_str()), Role::NodeLabel);
            label.owner = Some(node.id.clone());
            shape.bound_elements.push(BoundRef {
                id: label.id.clone(),
                kind: BoundKind::Text,
            });
            self.shape_ids.insert(node.id.clone(), shape.id.clone());
            self.elements.push(shape);
            self.elements.push(label);

            if diagram.dialect == Dialect::EntityRelationship && node.is_multiline() {
                let separator = self.separator(node, placed.rect, label_rect.y, colors.stroke);
                self.elements.push(separator);
            }
        }
    }

    /// Horizontal rule across `rect` under the first label line.
    fn separator(&mut self, node: &Node, rect: Rect, text_top: f64, stroke: &str) -> Element {
        let y = text_top + self.cfg.line_height;
        let body = ElementBody::Line {
            points: vec![[0.0, 0.0], [rect.width, 0.0]],
        };
        let mut line = self.element(body, Rect::new(rect.x, y, rect.width, 0.0), stroke, TRANSPARENT, Role::Separator);
        line.owner = Some(node.id.clone());
        line
    }

    fn lifelines(&mut self, lifelines: &[Lifeline]) {
        for lifeline in lifelines {
            let length = lifeline.bottom - lifeline.top;
            let body = ElementBody::Line {
                points: vec![[0.0, 0.0], [0.0, length]],
            };
            let rect = Rect::new(lifeline.x, lifeline.top, 0.0, length);
            let mut line = self.element(body, rect, CONNECTOR_STROKE, TRANSPARENT, Role::Lifeline);
            line.stroke_style = "dashed";
            line.stroke_width = 1.0;
            line.owner = Some(lifeline.node_id.clone());
            self.elements.push(line);
        }
    }

    fn edges(&mut self, dialect: Dialect, edges: &[RoutedEdge]) {
        for edge in edges.iter().filter(|e| e.is_drawable()) {
            let (Some(from), Some(to)) = (
                self.shape_ids.get(&edge.from_id).cloned(),
                self.shape_ids.get(&edge.to_id).cloned(),
            ) else {
                continue;
            };
            let origin = edge.waypoints[0];
            let points: Vec<[f64; 2]> = edge
                .waypoints
                .iter()
                .map(|p| [p.x - origin.x, p.y - origin.y])
                .collect();
            let (w, h) = extent(&points);
            let body = ElementBody::Arrow {
                points,
                start_binding: Some(self.binding(from)),
                end_binding: Some(self.binding(to)),
                start_arrowhead: arrowhead(edge.start_head),
                end_arrowhead: arrowhead(edge.end_head),
            };
            let mut arrow = self.element(
                body,
                Rect::new(origin.x, origin.y, w, h),
                TEXT_COLOR,
                TRANSPARENT,
                Role::Connector,
            );
            match edge.line_style {
                Some(LineStyle::Dashed) => arrow.stroke_style = "dashed",
                Some(LineStyle::Thick) => arrow.stroke_width = 4.0,
                _ => {}
            }

            let label = match edge.label.as_deref().filter(|l| !l.is_empty()) {
                Some(text) => {
                    let mut rect = self.centered(text, label_anchor(&edge.waypoints));
                    if dialect == Dialect::Sequence {
                        rect.y -= rect.height / 2.0 + MESSAGE_LABEL_LIFT;
                    }
                    let label = self.text(text, rect, "center", Some(arrow.id.as_str()), Role::ConnectorLabel);
                    arrow.bound_elements.push(BoundRef {
                        id: label.id.clone(),
                        kind: BoundKind::Text,
                    });
                    Some(label)
                }
                None => None,
            };
            self.elements.push(arrow);
            self.elements.extend(label);
        }
    }

    fn binding(&self, element_id: String) -> Binding {
        Binding {
            element_id,
            focus: 0.0,
            gap: self.cfg.binding_gap,
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn shape_body(shape: NodeShape) -> ElementBody {
    match shape {
        NodeShape::Ellipse => ElementBody::Ellipse {},
        NodeShape::Diamond => ElementBody::Diamond {},
        NodeShape::Rectangle | NodeShape::Cylinder | NodeShape::Stadium | NodeShape::Hexagon => {
            ElementBody::Rectangle {}
        }
    }
}

fn arrowhead(head: ArrowHead) -> Option<&'static str> {
    match head {
        ArrowHead::None => None,
        ArrowHead::Closed => Some("triangle"),
        ArrowHead::Open => Some("arrow"),
        ArrowHead::Dot => Some("dot"),
        ArrowHead::Cross => Some("bar"),
    }
}

/// Bounding-box size of relative points.
fn extent(points: &[[f64; 2]]) -> (f64, f64) {
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64);
    for &[x, y] in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    (max_x - min_x, max_y - min_y)
}

/// Midpoint of the middle segment of a polyline.
fn label_anchor(waypoints: &[Point]) -> Point {
    let i = (waypoints.len() - 1) / 2;
    let (a, b) = (waypoints[i], waypoints[i + 1]);
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
