//! Conversion of source lyric formats into `{base|reading}` ruby markup.

use std::sync::LazyLock;

use regex::Regex;

use crate::kana::CIRCLED_NUMBERS;

/// How the raw lyric text is marked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum LyricFormat {
    /// Already `{base|reading}` markup, one lyric line per text line.
    #[default]
    Plain,

    /// Moegirl wiki source (`{{Photrans|base|reading}}` templates).
    Moegirl,

    /// Utaten lyric page HTML (`<span class="ruby">` markup, `<br>` line breaks).
    Utaten,
}

static WIKI_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<--.*?-->").expect("valid regex"));
static PHOTRANS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{Photrans\|([^|]+)\|([^}]+)\}\}").expect("valid regex"));
static LJ: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{lj\|([^}]+)\}\}").expect("valid regex"));
static HIRAGANA_DIV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<div\s+class="hiragana"\s*[^>]*>"#).expect("valid regex"));
static RUBY_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<span class="ruby"><span class="rb">(.*?)</span><span class="rt">(.*?)</span></span>"#,
    )
    .expect("valid regex")
});
static BR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<br\s*/?>\s*").expect("valid regex"));

/// Convert `text` into plain ruby markup lines.
pub fn normalize(text: &str, format: LyricFormat) -> Vec<String> {
    match format {
        LyricFormat::Plain => text.lines().map(str::to_string).collect(),
        LyricFormat::Moegirl => text.lines().map(moegirl_line).collect(),
        LyricFormat::Utaten => utaten_lines(text),
    }
}

fn moegirl_line(line: &str) -> String {
    if line.is_empty() || line.starts_with('|') {
        return String::new();
    }

    let line = line.replace("#NoHover", "");
    let line = WIKI_COMMENT.replace_all(&line, "");
    let line = PHOTRANS.replace_all(&line, "{$1|$2}");
    let mut line = LJ.replace_all(&line, "$1").into_owned();

    // Longest markers first so `@12` is not read as `@1` followed by `2`.
    for (i, glyph) in CIRCLED_NUMBERS.iter().enumerate().rev() {
        line = line.replace(&format!("@{}", i + 1), &glyph.to_string());
    }
    line
}

fn utaten_lines(text: &str) -> Vec<String> {
    let mut body = text;
    if let Some(open) = HIRAGANA_DIV.find(body) {
        body = body[open.end()..].trim();
    }
    if let Some(close) = body.find("</div>") {
        body = body[..close].trim();
    }

    let body = RUBY_SPAN.replace_all(body, "{$1|$2}");
    BR.split(&body).map(str::to_string).collect()
}
