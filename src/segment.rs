use serde::{Deserialize, Serialize};

/// A timestamp in hundredths of a second (centiseconds).
pub type Centis = i64;

/// Start/end timestamps assigned to a segment by the forced aligner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Centis,
    pub end: Centis,
}

impl Span {
    pub fn new(start: Centis, end: Centis) -> Self {
        Self { start, end }
    }
}

/// What a segment is, as decided by the classifier.
///
/// Ruby groups are one `RubyAnchor` (carrying the base text as its surface) followed by zero
/// or more `RubyContinuation`s with an empty surface. Each variant carries one reading syllable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentKind {
    /// Punctuation, whitespace, unannotated kanji, and the `\n` line marker.
    Other,
    /// One orthographic syllable of an English word.
    LatinWord,
    RubyAnchor { reading: String },
    RubyContinuation { reading: String },
    /// A kana unit, or (in the `ja` profile) a Latin letter read literally.
    Literal,
    /// A run of digits or numeral glyphs, pronounced as English words.
    Numeral,
}

impl SegmentKind {
    /// The ruby reading syllable, for ruby kinds.
    pub fn reading(&self) -> Option<&str> {
        match self {
            Self::RubyAnchor { reading } | Self::RubyContinuation { reading } => Some(reading),
            Self::Other | Self::LatinWord | Self::Literal | Self::Numeral => None,
        }
    }

    pub fn is_ruby(&self) -> bool {
        self.reading().is_some()
    }
}

/// The atomic unit threaded through the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub surface: String,
    pub kind: SegmentKind,
    /// Canonical lowercase romanized pronunciation; empty until annotated.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pronunciation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl Segment {
    pub fn new(surface: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            surface: surface.into(),
            kind,
            pronunciation: String::new(),
            span: None,
        }
    }

    pub fn other(surface: impl Into<String>) -> Self {
        Self::new(surface, SegmentKind::Other)
    }

    /// The line boundary marker.
    pub fn newline() -> Self {
        Self::other("\n")
    }

    pub fn is_newline(&self) -> bool {
        self.kind == SegmentKind::Other && self.surface == "\n"
    }

    pub fn is_other(&self) -> bool {
        self.kind == SegmentKind::Other
    }

    /// An untimed-able separator: ASCII or ideographic space.
    pub fn is_space(&self) -> bool {
        self.kind == SegmentKind::Other && is_space_surface(&self.surface)
    }

    /// Literal, word and numeral segments (everything rendered with a plain timestamp).
    pub fn is_plain_text(&self) -> bool {
        matches!(
            self.kind,
            SegmentKind::LatinWord | SegmentKind::Literal | SegmentKind::Numeral
        )
    }

    pub fn start(&self) -> Option<Centis> {
        self.span.map(|s| s.start)
    }

    pub fn end(&self) -> Option<Centis> {
        self.span.map(|s| s.end)
    }
}

pub(crate) fn is_space_surface(surface: &str) -> bool {
    surface == " " || surface == "\u{3000}"
}

/// Index ranges of each line, excluding the trailing newline marker.
///
/// A trailing run without a newline marker is still reported as a line.
pub fn line_ranges(segments: &[Segment]) -> Vec<std::ops::Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for (i, seg) in segments.iter().enumerate() {
        if seg.is_newline() {
            ranges.push(start..i);
            start = i + 1;
        }
    }
    if start < segments.len() {
        ranges.push(start..segments.len());
    }
    ranges
}
