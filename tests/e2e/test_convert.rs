//! End-to-end tests for the public conversion API, one section per dialect.

use mermaid_scene::renderers::{BoundKind, ElementBody, Role};
use mermaid_scene::syntax::types::{
    ArrowHead, Dialect, Direction, LineStyle, NodeShape, StyleCategory,
};
use mermaid_scene::{ConvertError, RenderConfig, convert, convert_with_config, layout};

// ─── Flowchart ───────────────────────────────────────────────────────────────

#[test]
fn test_flowchart_scenario() {
    let out = convert("flowchart TD\n A[Start] --> B{Check}\n B --> C[End]").unwrap();
    let d = &out.diagram;
    assert_eq!(d.dialect, Dialect::Flowchart);
    assert_eq!(d.nodes.len(), 3);
    assert_eq!(d.edges.len(), 2);
    assert_eq!(d.node("B").unwrap().shape, NodeShape::Diamond);

    let lr = layout::layout(d, &RenderConfig::default());
    let ranks: Vec<usize> = ["A", "B", "C"].iter().map(|id| lr.node(id).unwrap().rank).collect();
    assert_eq!(ranks, vec![0, 1, 2]);

    assert_eq!(out.scene.shapes().count(), 3);
    assert_eq!(out.scene.arrows().count(), 2);
}

#[test]
fn test_flowchart_shapes_drive_styles() {
    let out = convert(
        "graph LR\n api[Orders API] --> db[(Orders)]\n api --> orch{{Scheduler}}\n web([Shop frontend]) --> api",
    )
    .unwrap();
    let d = &out.diagram;
    assert_eq!(d.direction, Direction::LR);
    assert_eq!(d.node("db").unwrap().style, Some(StyleCategory::Db));
    assert_eq!(d.node("orch").unwrap().style, Some(StyleCategory::Orchestrator));
    assert_eq!(d.node("api").unwrap().style, Some(StyleCategory::Service));
    assert_eq!(d.node("web").unwrap().style, Some(StyleCategory::Ui));

    let db_shape = out.scene.shape_for("db").unwrap();
    let web_shape = out.scene.shape_for("web").unwrap();
    assert_ne!(db_shape.background_color, web_shape.background_color);
}

#[test]
fn test_flowchart_subgraph_frame_encloses_members() {
    let src = "flowchart TD\n subgraph backend[Backend]\n api --> worker\n end\n ui --> api";
    let out = convert(src).unwrap();
    let frame = out.scene.with_role(Role::SubgraphFrame).next().unwrap();
    for id in ["api", "worker"] {
        let s = out.scene.shape_for(id).unwrap();
        assert!(s.x >= frame.x && s.y >= frame.y);
        assert!(s.x + s.width <= frame.x + frame.width);
        assert!(s.y + s.height <= frame.y + frame.height);
    }
    let title = out.scene.with_role(Role::SubgraphLabel).next().unwrap();
    assert_eq!(title.text(), Some("Backend"));
}

#[test]
fn test_flowchart_edge_variants() {
    let out = convert("flowchart TD\n A -.-> B\n B ==> C\n C --- D\n D --o E\n E --x F").unwrap();
    let e = &out.diagram.edges;
    assert_eq!(e[0].line_style, Some(LineStyle::Dashed));
    assert_eq!(e[1].line_style, Some(LineStyle::Thick));
    assert_eq!(e[2].end_head, ArrowHead::None);
    assert_eq!(e[3].end_head, ArrowHead::Dot);
    assert_eq!(e[4].end_head, ArrowHead::Cross);

    let arrows: Vec<_> = out.scene.arrows().collect();
    assert_eq!(arrows[0].stroke_style, "dashed");
    assert_eq!(arrows[1].stroke_width, 4.0);
}

#[test]
fn test_direction_override_only_touches_layout() {
    let cfg = RenderConfig {
        direction_override: Some(Direction::LR),
        ..RenderConfig::default()
    };
    let out = convert_with_config("flowchart TD\n A --> B", &cfg).unwrap();
    assert_eq!(out.diagram.direction, Direction::TD);
    let a = out.scene.shape_for("A").unwrap();
    let b = out.scene.shape_for("B").unwrap();
    assert!(a.x < b.x);
    assert_eq!(a.y, b.y);
}

// ─── Sequence ────────────────────────────────────────────────────────────────

#[test]
fn test_sequence_scenario() {
    let out = convert("sequenceDiagram\n Client->>API: Request\n API-->>Client: Response").unwrap();
    let d = &out.diagram;
    let ids: Vec<&str> = d.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["Client", "API"]);
    assert_eq!(d.edges.len(), 2);
    assert_eq!(d.edges[1].line_style, Some(LineStyle::Dashed));

    let client = out.scene.shape_for("Client").unwrap();
    let api = out.scene.shape_for("API").unwrap();
    assert!(client.x < api.x);
    assert_eq!(out.scene.with_role(Role::Lifeline).count(), 2);

    let labels: Vec<&str> = out
        .scene
        .with_role(Role::ConnectorLabel)
        .filter_map(|e| e.text())
        .collect();
    assert_eq!(labels, vec!["Request", "Response"]);
}

#[test]
fn test_sequence_actor_drawn_as_ellipse() {
    let out = convert("sequenceDiagram\n actor Alice\n Alice->>Shop: buy").unwrap();
    assert_eq!(out.scene.shape_for("Alice").unwrap().body.type_name(), "ellipse");
    assert_eq!(out.diagram.node("Alice").unwrap().style, Some(StyleCategory::User));
}

// ─── Entity-relationship ─────────────────────────────────────────────────────

#[test]
fn test_er_scenario() {
    let out = convert("erDiagram\n USER ||--o{ ORDER : places").unwrap();
    let d = &out.diagram;
    assert_eq!(d.nodes.len(), 2);
    assert!(d.nodes.iter().all(|n| !n.is_multiline()));
    assert_eq!(d.edges.len(), 1);
    assert_eq!(d.edges[0].label.as_deref(), Some("places"));
    assert_eq!(out.scene.with_role(Role::Separator).count(), 0);
}

#[test]
fn test_er_attributes_and_cardinality_fallback() {
    let src = "erDiagram\n CUSTOMER ||--o{ ORDER : \"\"\n CUSTOMER {\n  string name\n  int id PK\n }\n ORDER }|..|{ LINE_ITEM : contains";
    let out = convert(src).unwrap();
    let d = &out.diagram;
    assert_eq!(d.node("CUSTOMER").unwrap().label, "CUSTOMER\nstring name\nint id PK");
    assert_eq!(d.edges[0].label.as_deref(), Some("1:0..n"));
    assert!(d.edges[1].is_dashed());
    assert_eq!(d.node("ORDER").unwrap().style, Some(StyleCategory::Db));
    assert_eq!(out.scene.with_role(Role::Separator).count(), 1);
}

// ─── Directive ───────────────────────────────────────────────────────────────

#[test]
fn test_directive_override_beats_keywords() {
    let src = "%%{styles: {A: db}}%%\nflowchart TD\n A[React App] --> B[Web client]";
    let out = convert(src).unwrap();
    assert_eq!(out.diagram.node("A").unwrap().style, Some(StyleCategory::Db));
    assert_eq!(out.diagram.node("B").unwrap().style, Some(StyleCategory::Ui));
    assert_eq!(out.diagram.source, src);
}

// ─── Errors & scene invariants ───────────────────────────────────────────────

#[test]
fn test_unknown_dialect_is_an_error() {
    let err = convert("classDiagram\n Animal <|-- Duck").unwrap_err();
    assert_eq!(
        err,
        ConvertError::UnrecognizedDialect {
            header: "classDiagram".into()
        }
    );
}

#[test]
fn test_texts_match_text_elements() {
    let out = convert("flowchart TD\n A[One] -->|go| B[Two]").unwrap();
    let texts: Vec<&str> = out.scene.texts.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["One", "Two", "go"]);
    for t in &out.scene.texts {
        assert!(out.scene.get(&t.id).unwrap().is_text());
    }
}

#[test]
fn test_arrow_bindings_resolve_to_shapes() {
    let out = convert("flowchart TD\n A --> B\n B --> A").unwrap();
    for arrow in out.scene.arrows() {
        let ElementBody::Arrow { start_binding, end_binding, .. } = &arrow.body else {
            unreachable!();
        };
        for b in [start_binding, end_binding] {
            let target = out.scene.get(&b.as_ref().unwrap().element_id).unwrap();
            assert_eq!(target.role, Role::Shape);
            assert!(target
                .bound_elements
                .iter()
                .any(|r| r.kind == BoundKind::Arrow && r.id == arrow.id));
        }
    }
}

#[test]
fn test_seed_changes_ids_not_geometry() {
    let a = convert_with_config("flowchart TD\n A --> B", &RenderConfig { seed: 1, ..RenderConfig::default() }).unwrap();
    let b = convert_with_config("flowchart TD\n A --> B", &RenderConfig { seed: 2, ..RenderConfig::default() }).unwrap();
    assert_ne!(a.scene.elements[0].id, b.scene.elements[0].id);
    assert_eq!(a.scene.elements[0].x, b.scene.elements[0].x);
    assert_eq!(a.scene.elements.len(), b.scene.elements.len());
}
