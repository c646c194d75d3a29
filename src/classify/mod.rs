//! Render-category classification for arbitrary JSON payloads
//!
//! Stateless, per-value classification used by detail views to pick a
//! rendering widget. String classification is a heuristic pattern ladder
//! with ordered-rule-wins semantics; it can misread prose containing
//! code-like tokens (a stray `=>` classifies as code) and code matching no
//! pattern falls back to text. That ambiguity is accepted; the ladder's
//! exact order is the compatibility contract.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rendering category for one JSON value.
///
/// `Unknown` exists for contract completeness; it is never produced for a
/// `serde_json::Value`, whose variants the other categories cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderCategory {
    Null,
    Primitive,
    Text,
    Code,
    Array,
    Object,
    Unknown,
}

/// Presumed source language of a code payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Python,
    Javascript,
    Json,
}

impl Language {
    /// Highlighter tag for this language.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Json => "json",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patterns whose match anywhere in a string marks it as code, in ladder
/// order: python/javascript declarations, imports, indentation runs, arrow
/// tokens, opening brace followed by a line break.
static CODE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?m)^def\s+\w+",
        r"(?m)^function\s+\w+",
        r"(?m)^import\s+",
        r"(?m)^from\s+\w+\s+import",
        r"(?m)^\s{2,}\w+",
        r"=>",
        r"\{\s*\n",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("static code pattern"))
    .collect()
});

/// Python hints: start-of-string `def`, or an import anywhere.
static PYTHON_HINTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^def\s+\w+|import\s+\w+|from\s+\w+\s+import").expect("python hints"));

/// Javascript hints: start-of-string `function`, or a binding keyword or
/// arrow token anywhere.
static JAVASCRIPT_HINTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^function\s+\w+|const\s+\w+|let\s+\w+|var\s+\w+|=>").expect("javascript hints")
});

/// JSON shape sniff: an object opener followed by a quoted key.
static JSON_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^\{\s*""#).expect("json shape"));

/// Classify one JSON value into its rendering category.
///
/// Pure and total over any well-formed JSON value; the field label is part
/// of the call contract but unused by the rules. Classification is one
/// level deep: nested arrays/objects are classified again per element by
/// the rendering walk, not here.
pub fn classify(_label: &str, value: &Value) -> RenderCategory {
    match value {
        Value::Null => RenderCategory::Null,
        Value::Bool(_) | Value::Number(_) => RenderCategory::Primitive,
        Value::String(text) => {
            if CODE_PATTERNS.iter().any(|pattern| pattern.is_match(text)) {
                RenderCategory::Code
            } else {
                RenderCategory::Text
            }
        }
        Value::Array(_) => RenderCategory::Array,
        Value::Object(_) => RenderCategory::Object,
    }
}

/// Guess the language of a code payload for highlighting.
///
/// Ordered heuristics: python tokens, then javascript tokens, then a JSON
/// sniff of the trimmed text; python is the fixed fallback.
pub fn detect_language(code: &str) -> Language {
    if PYTHON_HINTS.is_match(code) {
        Language::Python
    } else if JAVASCRIPT_HINTS.is_match(code) {
        Language::Javascript
    } else if JSON_SHAPE.is_match(code.trim()) {
        Language::Json
    } else {
        Language::Python
    }
}
