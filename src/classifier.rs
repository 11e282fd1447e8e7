//! Segment classification: raw lyric lines to typed segments.

use std::sync::LazyLock;

use regex::Regex;

use crate::kana::{is_kana, is_latin, split_syllables};
use crate::numeral::is_numeral;
use crate::opts::{Language, Opts};
use crate::segment::{Segment, SegmentKind};
use crate::{Error, Result};

static RUBY_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{.*?\}").expect("valid regex"));

/// Classifier settings taken from [`Opts`].
#[derive(Debug, Clone, Copy)]
pub struct ClassifyOpts {
    pub language: Language,
    pub sokuon_split: bool,
    pub hatsuon_split: bool,
}

impl From<&Opts> for ClassifyOpts {
    fn from(opts: &Opts) -> Self {
        Self {
            language: opts.language,
            sokuon_split: opts.sokuon_split,
            hatsuon_split: opts.hatsuon_split,
        }
    }
}

/// Classify every non-blank line and terminate each with a newline segment.
pub fn classify_lyrics<S: AsRef<str>>(lines: &[S], opts: ClassifyOpts) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        segments.extend(classify_line(line, opts)?);
        segments.push(Segment::newline());
    }
    Ok(segments)
}

/// Classify one line of `{base|reading}` markup.
pub fn classify_line(line: &str, opts: ClassifyOpts) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for group in RUBY_GROUP.find_iter(line) {
        classify_plain(&line[cursor..group.start()], opts, &mut segments);
        classify_ruby(group.as_str(), opts, &mut segments)?;
        cursor = group.end();
    }
    classify_plain(&line[cursor..], opts, &mut segments);

    Ok(segments)
}

fn classify_ruby(markup: &str, opts: ClassifyOpts, out: &mut Vec<Segment>) -> Result<()> {
    let content = &markup[1..markup.len() - 1];
    let parts: Vec<&str> = content.split('|').collect();
    let [base, reading] = parts[..] else {
        return Err(Error::format(
            markup,
            format!("expected `base|reading`, found {} part(s)", parts.len()),
        ));
    };

    let syllables = split_syllables(reading, opts.sokuon_split, opts.hatsuon_split);
    let mut syllables = syllables.into_iter();
    let Some(first) = syllables.next() else {
        return Err(Error::format(markup, "empty reading"));
    };

    out.push(Segment::new(base, SegmentKind::RubyAnchor { reading: first }));
    out.extend(
        syllables.map(|reading| Segment::new("", SegmentKind::RubyContinuation { reading })),
    );
    Ok(())
}

fn classify_plain(text: &str, opts: ClassifyOpts, out: &mut Vec<Segment>) {
    for unit in split_syllables(text, opts.sokuon_split, opts.hatsuon_split) {
        match opts.language {
            Language::Ja => {
                let kind = if is_kana(&unit) || is_latin(&unit) {
                    SegmentKind::Literal
                } else {
                    SegmentKind::Other
                };
                out.push(Segment::new(unit, kind));
            }
            Language::JaEn => classify_mixed_unit(unit, out),
        }
    }
}

fn classify_mixed_unit(unit: String, out: &mut Vec<Segment>) {
    if is_kana(&unit) {
        out.push(Segment::new(unit, SegmentKind::Literal));
    } else if is_latin(&unit) || unit == "'" {
        match out.last_mut() {
            Some(last) if last.kind == SegmentKind::LatinWord => last.surface.push_str(&unit),
            _ if unit != "'" => out.push(Segment::new(unit, SegmentKind::LatinWord)),
            _ => out.push(Segment::other(unit)),
        }
    } else if is_numeral(&unit) {
        match out.last_mut() {
            Some(last) if last.kind == SegmentKind::Numeral => last.surface.push_str(&unit),
            _ => out.push(Segment::new(unit, SegmentKind::Numeral)),
        }
    } else {
        out.push(Segment::other(unit));
    }
}
