//! Property-based invariants of the conversion pipeline.
//!
//! 1. Flowchart rank equals the longest path from any root
//! 2. Sequence participant order equals first appearance
//! 3. Shape count equals node count; arrow count equals resolved edge count
//! 4. Z-order tokens strictly increase and ids are unique
//! 5. Arrow bindings and shape back-references agree
//! 6. Stripping a directive is idempotent
//! 7. A directive override always wins

use std::collections::{HashMap, HashSet};

use mermaid_scene::renderers::{BoundKind, Scene};
use mermaid_scene::style::resolve_style;
use mermaid_scene::syntax::directive::{extract_directive, strip_directive};
use mermaid_scene::syntax::types::{NodeShape, StyleCategory};
use mermaid_scene::{RenderConfig, convert, layout};
use proptest::prelude::*;

// ── Generators ──────────────────────────────────────────────────────────────

/// Flowchart over `n` nodes with forward edges only (`i < j`).
fn dag_source(n: usize, pairs: &[(usize, usize)]) -> (String, Vec<(usize, usize)>) {
    let mut src = String::from("flowchart TD\n");
    for i in 0..n {
        src.push_str(&format!("  N{i}\n"));
    }
    let mut edges = Vec::new();
    for &(a, b) in pairs {
        let (a, b) = (a % n, b % n);
        if a < b {
            src.push_str(&format!("  N{a} --> N{b}\n"));
            edges.push((a, b));
        }
    }
    (src, edges)
}

fn longest_paths(n: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut rank = vec![0usize; n];
    // Forward edges only, so index order is a topological order.
    for j in 0..n {
        for &(a, b) in edges {
            if b == j {
                rank[j] = rank[j].max(rank[a] + 1);
            }
        }
    }
    rank
}

#[derive(Debug, Clone)]
enum SeqLine {
    Declare(usize),
    Message(usize, usize),
}

fn seq_line() -> impl Strategy<Value = SeqLine> {
    prop_oneof![
        (0..6usize).prop_map(SeqLine::Declare),
        (0..6usize, 0..6usize).prop_map(|(a, b)| SeqLine::Message(a, b)),
    ]
}

fn note(id: String, seen: &mut Vec<String>) {
    if !seen.contains(&id) {
        seen.push(id);
    }
}

fn category() -> impl Strategy<Value = StyleCategory> {
    proptest::sample::select(StyleCategory::ALL.to_vec())
}

fn assert_scene_invariants(scene: &Scene) {
    let ids: HashSet<&str> = scene.elements.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids.len(), scene.elements.len());
    assert!(scene.elements.windows(2).all(|w| w[0].index < w[1].index));

    for arrow in scene.arrows() {
        let (start, end) = arrow.bindings();
        for b in [start, end].into_iter().flatten() {
            let shape = scene.get(&b.element_id).expect("bound shape exists");
            assert!(shape.bound_elements.iter().any(|r| r.id == arrow.id));
        }
    }
    for el in &scene.elements {
        for r in el.bound_elements.iter().filter(|r| r.kind == BoundKind::Arrow) {
            let (start, end) = scene.get(&r.id).expect("arrow exists").bindings();
            assert!([start, end].into_iter().flatten().any(|b| b.element_id == el.id));
        }
    }
}

// ── Properties ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn prop_flowchart_rank_is_longest_path(
        n in 1usize..9,
        pairs in proptest::collection::vec((0usize..9, 0usize..9), 0..16),
    ) {
        let (src, edges) = dag_source(n, &pairs);
        let out = convert(&src).unwrap();
        let lr = layout::layout(&out.diagram, &RenderConfig::default());
        let expected = longest_paths(n, &edges);
        for (i, want) in expected.iter().enumerate() {
            let id = format!("N{i}");
            prop_assert_eq!(lr.node(&id).unwrap().rank, *want, "node {}", id);
        }
    }

    #[test]
    fn prop_flowchart_scene_counts_and_bindings(
        n in 1usize..8,
        pairs in proptest::collection::vec((0usize..8, 0usize..8), 0..14),
    ) {
        let mut src = String::from("flowchart LR\n");
        for i in 0..n {
            src.push_str(&format!("  N{i}[Node {i}]\n"));
        }
        for &(a, b) in &pairs {
            src.push_str(&format!("  N{} --> N{}\n", a % n, b % n));
        }
        let out = convert(&src).unwrap();
        prop_assert_eq!(out.scene.shapes().count(), out.diagram.nodes.len());
        prop_assert_eq!(out.scene.arrows().count(), out.diagram.resolved_edges().count());
        assert_scene_invariants(&out.scene);
    }

    #[test]
    fn prop_sequence_first_appearance_order(lines in proptest::collection::vec(seq_line(), 1..20)) {
        let mut src = String::from("sequenceDiagram\n");
        let mut expected: Vec<String> = Vec::new();
        for line in &lines {
            match *line {
                SeqLine::Declare(p) => {
                    src.push_str(&format!("  participant P{p}\n"));
                    note(format!("P{p}"), &mut expected);
                }
                SeqLine::Message(a, b) => {
                    src.push_str(&format!("  P{a}->>P{b}: m\n"));
                    note(format!("P{a}"), &mut expected);
                    note(format!("P{b}"), &mut expected);
                }
            }
        }
        let out = convert(&src).unwrap();
        let got: Vec<String> = out.diagram.nodes.iter().map(|n| n.id.clone()).collect();
        prop_assert_eq!(&got, &expected);

        let xs: Vec<f64> = got.iter().map(|id| out.scene.shape_for(id).unwrap().x).collect();
        prop_assert!(xs.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(out.scene.arrows().count(), out.diagram.edges.len());
        assert_scene_invariants(&out.scene);
    }

    #[test]
    fn prop_er_scene_counts(
        n in 1usize..10,
        pairs in proptest::collection::vec((0usize..10, 0usize..10), 0..12),
    ) {
        let mut src = String::from("erDiagram\n");
        for i in 0..n {
            src.push_str(&format!("  E{i} {{\n    int id PK\n  }}\n"));
        }
        for &(a, b) in &pairs {
            src.push_str(&format!("  E{} ||--o{{ E{} : rel\n", a % n, b % n));
        }
        let out = convert(&src).unwrap();
        prop_assert_eq!(out.diagram.nodes.len(), n);
        prop_assert_eq!(out.scene.shapes().count(), n);
        prop_assert_eq!(out.scene.arrows().count(), pairs.len());
        assert_scene_invariants(&out.scene);
    }

    #[test]
    fn prop_strip_without_directive_only_trims(text in "[a-zA-Z0-9 \n>|:;%-]{0,60}") {
        prop_assume!(!text.contains("%%{"));
        prop_assert_eq!(strip_directive(&text), text.trim());
    }

    #[test]
    fn prop_strip_is_idempotent(
        head in "[a-z %{}]{0,12}",
        body in "[a-zA-Z0-9 \n>%{}-]{0,40}",
        cat in category(),
    ) {
        let text = format!("{head}%%{{styles: {{A: {cat}}}}}%%{body}");
        let once = strip_directive(&text);
        prop_assert_eq!(strip_directive(&once), once.clone());
        prop_assert!(extract_directive(&once).overrides.is_empty());
    }

    #[test]
    fn prop_override_always_wins(
        label in "(React App|Postgres|Redis cache|Kafka queue|Payments API|S3 bucket|GPT agent|plain)",
        shape in proptest::sample::select(vec![
            NodeShape::Rectangle, NodeShape::Cylinder, NodeShape::Hexagon, NodeShape::Diamond,
        ]),
        cat in category(),
    ) {
        let overrides = HashMap::from([("A".to_string(), cat)]);
        prop_assert_eq!(resolve_style("A", &label, shape, &overrides), Some(cat));
    }
}
