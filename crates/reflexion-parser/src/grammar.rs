//! Line grammar of the diagram DSL
//!
//! One compiled pattern per construct. Classification tries the constructs
//! in a fixed order; anything that matches nothing is reported back to the
//! caller as an unrecognized line.

use reflexion_core::{EdgeStyle, NodeKind};
use regex::Regex;
use std::sync::LazyLock;

/// Arrow tokens in match order (longest first) with the style they encode.
/// All arrows point left-to-right in this DSL.
const ARROW_STYLES: [(&str, EdgeStyle); 6] = [
    ("*-->", EdgeStyle::Composition),
    ("--|>", EdgeStyle::Inheritance),
    ("..>", EdgeStyle::DashedDependency),
    ("-->", EdgeStyle::SolidAssociation),
    (".>", EdgeStyle::DashedDependency),
    ("->", EdgeStyle::SolidAssociation),
];

static RE_BLOCK_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:package|namespace|folder)\s+(?:"([^"]+)"|([^\s{"]+))\s*\{$"#).unwrap()
});

static RE_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(component|interface|class|package)\s+(?:"([^"]+)"|([^\s"]+))(?:\s+as\s+(\S+))?$"#)
        .unwrap()
});

static RE_RELATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(\S+?)\s*(?:"([^"]*)"\s*)?(\*-->|--\|>|\.\.>|-->|\.>|->)\s*(\S+?):?(?:\s*:\s*(.+))?$"#,
    )
    .unwrap()
});

static RE_NOTE_SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^note\s+(?:left|right|top|bottom)?\s*(?:of\s+\S+)?\s*:"#).unwrap());

static RE_NOTE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^note\b[^:]*$"#).unwrap());

/// Directives are recognized and discarded without a warning.
const DIRECTIVE_PREFIXES: [&str; 8] = [
    "skinparam",
    "title",
    "legend",
    "end legend",
    "left to right direction",
    "top to bottom direction",
    "hide",
    "scale",
];

/// What a single trimmed, non-empty line means.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// `@startuml` / `@enduml`.
    Marker,
    /// Leading `'` comment.
    Comment,
    /// Rendering directive (`skinparam`, `title`, ...); never contributes
    /// nodes or edges.
    Directive,
    /// `package Name {` — opens a namespace block.
    BlockOpen { name: String },
    /// Bare `}` — closes the innermost namespace block.
    BlockClose,
    /// `note left of X: ...` on a single line.
    Note,
    /// `note over X` — everything until `end note` is discarded.
    NoteOpen,
    /// `end note`.
    NoteEnd,
    /// `component "Label" as alias` and friends.
    Declaration {
        kind: NodeKind,
        label: String,
        alias: Option<String>,
    },
    /// `A "builds" --> B : label`.
    Relation {
        source: String,
        target: String,
        style: EdgeStyle,
        /// Inline pre-arrow label, if any.
        inline_label: Option<String>,
        /// Post-colon label; takes precedence over the inline one.
        trailing_label: Option<String>,
    },
    /// Anything else — skipped with a warning.
    Unrecognized,
}

/// Classify one raw line. The caller is responsible for note-block state.
pub fn classify(raw: &str) -> Line {
    let line = raw.trim();
    debug_assert!(!line.is_empty());

    if line.eq_ignore_ascii_case("@startuml") || line.eq_ignore_ascii_case("@enduml") {
        return Line::Marker;
    }
    if line.starts_with('\'') {
        return Line::Comment;
    }
    if line == "}" {
        return Line::BlockClose;
    }
    if line.eq_ignore_ascii_case("end note") || line.eq_ignore_ascii_case("endnote") {
        return Line::NoteEnd;
    }
    if RE_NOTE_SINGLE.is_match(line) {
        return Line::Note;
    }
    if RE_NOTE_OPEN.is_match(line) {
        return Line::NoteOpen;
    }
    if let Some(caps) = RE_BLOCK_OPEN.captures(line) {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        return Line::BlockOpen { name };
    }
    if let Some(caps) = RE_DECLARATION.captures(line) {
        let kind = match &caps[1] {
            "component" => NodeKind::Component,
            "interface" => NodeKind::Interface,
            "class" => NodeKind::Class,
            "package" => NodeKind::Package,
            _ => unreachable!("restricted by the pattern"),
        };
        let label = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let alias = caps.get(4).map(|m| m.as_str().to_string());
        return Line::Declaration { kind, label, alias };
    }
    if let Some(caps) = RE_RELATION.captures(line) {
        let style = style_for_arrow(&caps[3]);
        return Line::Relation {
            source: caps[1].to_string(),
            target: caps[4].to_string(),
            style,
            inline_label: caps.get(2).map(|m| m.as_str().to_string()).filter(|s| !s.is_empty()),
            trailing_label: caps.get(5).map(|m| m.as_str().trim().to_string()),
        };
    }
    if is_directive(line) {
        return Line::Directive;
    }
    Line::Unrecognized
}

fn is_directive(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    DIRECTIVE_PREFIXES.iter().any(|p| lower.starts_with(p))
}

fn style_for_arrow(arrow: &str) -> EdgeStyle {
    for (token, style) in ARROW_STYLES {
        if arrow == token {
            return style;
        }
    }
    EdgeStyle::SolidAssociation
}
