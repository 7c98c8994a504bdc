//! Inline `%%{ ... }%%` directive blocks.
//!
//! A directive may carry a theme token and a `styles` map of id → category:
//!
//! ```text
//! %%{init: {"theme": "dark", "styles": {"A": "db", "web": "ui"}}}%%
//! ```
//!
//! Only the first block is read. Category tokens outside the vocabulary are
//! dropped silently.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::types::{StyleCategory, StyleDirective};

static BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)%%\{(.*?)\}%%").expect("valid directive regex"));

static THEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']?theme["']?\s*:\s*["']?([A-Za-z0-9_-]+)"#).expect("valid theme regex")
});

static STYLES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']?styles["']?\s*:\s*\{([^{}]*)\}"#).expect("valid styles regex")
});

static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']?([A-Za-z0-9_.-]+)["']?\s*:\s*["']?([A-Za-z0-9_-]+)["']?"#)
        .expect("valid pair regex")
});

/// Read the first directive block. No block yields an empty directive.
pub fn extract_directive(src: &str) -> StyleDirective {
    let mut directive = StyleDirective::new();
    let Some(caps) = BLOCK_RE.captures(src) else {
        return directive;
    };
    let body = caps.get(1).map_or("", |m| m.as_str());

    directive.theme = THEME_RE
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    if let Some(map) = STYLES_RE.captures(body).and_then(|c| c.get(1)) {
        for pair in PAIR_RE.captures_iter(map.as_str()) {
            let (id, token) = (&pair[1], &pair[2]);
            match token.parse::<StyleCategory>() {
                Ok(category) => {
                    directive.overrides.insert(id.to_string(), category);
                }
                Err(_) => trace!(id, token, "directive: dropping unknown style token"),
            }
        }
    }
    directive
}

/// Remove every directive block and trim the result.
///
/// Each block becomes a line break, so the text around a removed block can
/// never join into a new block. Stripping twice equals stripping once.
pub fn strip_directive(src: &str) -> String {
    BLOCK_RE.replace_all(src, "\n").trim().to_string()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
