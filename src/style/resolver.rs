//! Style category resolution.
//!
//! Precedence: directive override by id, then the shape table, then the
//! first label keyword group that matches. Anything else resolves to `None`
//! and is drawn with the neutral palette.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::syntax::types::{NodeShape, StyleCategory, StyleDirective};

// ─── Keyword groups ──────────────────────────────────────────────────────────

/// Label keyword groups in priority order.
const KEYWORD_GROUPS: &[(StyleCategory, &str)] = &[
    (
        StyleCategory::Db,
        r"\b(db|database|datastore|postgres\w*|mysql|mariadb|sql|sqlite|mongo\w*|dynamo\w*|cassandra|rds|oracle)\b",
    ),
    (StyleCategory::Cache, r"\b(cache\w*|redis|memcache\w*|cdn|varnish)\b"),
    (
        StyleCategory::Queue,
        r"\b(queue\w*|kafka|rabbit\w*|sqs|sns|pub/?sub|topic|event ?bus|broker|nats|stream\w*)\b",
    ),
    (
        StyleCategory::Service,
        r"\b(service\w*|api|server|backend|worker\w*|lambda|function|handler|microservice\w*)\b",
    ),
    (
        StyleCategory::Ui,
        r"\b(ui|frontend|front-end|web|webapp|app|react|vue|angular|svelte|browser|mobile|client|dashboard|spa)\b",
    ),
    (
        StyleCategory::Gateway,
        r"\b(gateway|proxy|load ?balancer|lb|nginx|envoy|ingress|router|firewall)\b",
    ),
    (
        StyleCategory::External,
        r"\b(external|third[- ]party|stripe|twilio|sendgrid|paypal|github|saas|vendor|partner)\b",
    ),
    (
        StyleCategory::Ai,
        r"\b(ai|llm|gpt\w*|claude|openai|model|agent\w*|ml|inference|embedding\w*|rag)\b",
    ),
    (
        StyleCategory::Storage,
        r"\b(storage|s3|bucket|blob|file ?system|files|disk|volume|object ?store)\b",
    ),
    (
        StyleCategory::User,
        r"\b(user\w*|customer\w*|actor|person|people|admin|human|operator)\b",
    ),
    (
        StyleCategory::Orchestrator,
        r"\b(orchestrat\w*|scheduler|workflow\w*|coordinator|airflow|temporal|k8s|kubernetes|controller)\b",
    ),
];

static KEYWORD_TABLE: LazyLock<Vec<(StyleCategory, Regex)>> = LazyLock::new(|| {
    KEYWORD_GROUPS
        .iter()
        .filter_map(|(category, pattern)| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .ok()
                .map(|re| (*category, re))
        })
        .collect()
});

// ─── Public API ──────────────────────────────────────────────────────────────

/// Category implied by a shape alone.
pub fn category_for_shape(shape: NodeShape) -> Option<StyleCategory> {
    match shape {
        NodeShape::Cylinder => Some(StyleCategory::Db),
        NodeShape::Hexagon => Some(StyleCategory::Orchestrator),
        NodeShape::Rectangle | NodeShape::Stadium | NodeShape::Ellipse | NodeShape::Diamond => None,
    }
}

/// First keyword group matching the label.
pub fn category_for_label(label: &str) -> Option<StyleCategory> {
    KEYWORD_TABLE
        .iter()
        .find(|(_, re)| re.is_match(label))
        .map(|(category, _)| *category)
}

/// Resolve a node's category against a precomputed override map.
pub fn resolve_style(
    id: &str,
    label: &str,
    shape: NodeShape,
    overrides: &HashMap<String, StyleCategory>,
) -> Option<StyleCategory> {
    overrides
        .get(id)
        .copied()
        .or_else(|| category_for_shape(shape))
        .or_else(|| category_for_label(label))
}

/// Resolver bound to one diagram's directive.
#[derive(Debug, Clone, Copy)]
pub struct StyleResolver<'a> {
    directive: &'a StyleDirective,
}

impl<'a> StyleResolver<'a> {
    pub fn new(directive: &'a StyleDirective) -> Self {
        Self { directive }
    }

    pub fn resolve(&self, id: &str, label: &str, shape: NodeShape) -> Option<StyleCategory> {
        resolve_style(id, label, shape, &self.directive.overrides)
    }

    /// Explicit override only; used for subgraphs.
    pub fn override_for(&self, id: &str) -> Option<StyleCategory> {
        self.directive.override_for(id)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
