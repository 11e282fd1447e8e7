//! Timing reconciliation around the forced aligner.
//!
//! Before alignment we pick the tokens to align and, depending on [`TailCorrect`], give line
//! breaks a token of their own. After alignment we write the spans back, pull phrase starts
//! into the non-silent range that carries them, optionally stretch tails, and split lines that
//! are too wide to display.

use tracing::warn;

use crate::backend::NonSilentRange;
use crate::opts::TailCorrect;
use crate::segment::{Centis, Segment, Span};
use crate::{Error, Result};

/// Guard kept between a stretched tail and the next segment's start.
const TAIL_GUARD_CS: Centis = 2;

/// The aligner input: every non-empty pronunciation, in order.
pub fn alignment_tokens(segments: &[Segment]) -> Vec<String> {
    segments
        .iter()
        .filter(|seg| !seg.pronunciation.is_empty())
        .map(|seg| seg.pronunciation.clone())
        .collect()
}

/// Write aligner spans back onto the segments [`alignment_tokens`] was built from.
pub fn apply_alignment(mut segments: Vec<Segment>, spans: Vec<Span>) -> Result<Vec<Segment>> {
    let expected = segments
        .iter()
        .filter(|seg| !seg.pronunciation.is_empty())
        .count();
    if expected != spans.len() {
        return Err(Error::AlignmentMismatch {
            expected,
            got: spans.len(),
        });
    }

    let timed = segments
        .iter_mut()
        .filter(|seg| !seg.pronunciation.is_empty());
    for (seg, span) in timed.zip(spans) {
        seg.span = Some(span);
    }
    Ok(segments)
}

/// Map spans aligned on audio played at `speed` back onto the original timeline.
pub fn rescale_spans(spans: Vec<Span>, speed: f64) -> Result<Vec<Span>> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(Error::msg(format!("audio speed must be positive, got {speed}")));
    }
    if speed == 1.0 {
        return Ok(spans);
    }

    let scale = |cs: Centis| (cs as f64 * speed).round() as Centis;
    Ok(spans
        .into_iter()
        .map(|span| Span::new(scale(span.start), scale(span.end)))
        .collect())
}

/// Give `Other` segments after a pronounced segment a tail token (`<last letter>h`).
///
/// Only [`TailCorrect::VowelBridge`] and [`TailCorrect::Always`] add tokens. `VowelBridge`
/// skips a break when the next pronunciation carries on with the same letter or opens with a
/// vowel.
pub fn assign_tail_tokens(mut segments: Vec<Segment>, mode: TailCorrect) -> Vec<Segment> {
    if !matches!(mode, TailCorrect::VowelBridge | TailCorrect::Always) {
        return segments;
    }

    for i in 1..segments.len() {
        if !segments[i].is_other() || segments[i - 1].is_other() {
            continue;
        }
        let Some(tail) = segments[i - 1].pronunciation.chars().last() else {
            continue;
        };

        if mode == TailCorrect::VowelBridge {
            let onset = segments[i + 1..]
                .iter()
                .find_map(|seg| seg.pronunciation.chars().next());
            if onset == Some(tail) || onset.is_some_and(is_vowel) {
                continue;
            }
        }

        segments[i].pronunciation = format!("{tail}h");
    }
    segments
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Pull the start of each phrase into the non-silent range its end falls in.
///
/// A phrase is a maximal run of non-`Other` segments. When no single range covers the whole
/// phrase, the first range containing its end moves the phrase start to that range's start,
/// but never past the first segment's own end. Phrases no range contains are left alone.
pub fn snap_to_non_silence(mut segments: Vec<Segment>, ranges: &[NonSilentRange]) -> Vec<Segment> {
    if ranges.is_empty() {
        return segments;
    }

    for (first, last) in phrases(&segments) {
        let (Some(start), Some(end)) = (segments[first].start(), segments[last].end()) else {
            continue;
        };

        let covered = ranges
            .iter()
            .take_while(|r| r.start_cs() <= start)
            .any(|r| r.end_cs() >= end);
        if covered {
            continue;
        }

        let Some(carrier) = ranges
            .iter()
            .take_while(|r| r.start_cs() <= end)
            .find(|r| r.end_cs() >= end)
        else {
            warn!(start, end, "phrase end lies in silence; leaving its start");
            continue;
        };

        if let Some(span) = segments[first].span.as_mut() {
            span.start = span.end.min(carrier.start_cs());
        }
    }
    segments
}

/// `(first, last)` indices of the timed segments bounding each phrase.
fn phrases(segments: &[Segment]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut open: Option<(usize, usize)> = None;

    for (i, seg) in segments.iter().enumerate() {
        if seg.is_other() {
            out.extend(open.take());
            continue;
        }
        if seg.span.is_none() {
            continue;
        }
        open = match open {
            Some((first, _)) => Some((first, i)),
            None => Some((i, i)),
        };
    }
    out.extend(open);
    out
}

/// Stretch the end of each segment that precedes a break, using a fine non-silence scan.
///
/// The end moves to the first fine range end at or after it that still falls before the next
/// timed segment. Failing that, if one fine range spans the whole gap, the end moves up to the
/// next start minus a small guard.
pub fn extend_tails(mut segments: Vec<Segment>, fine: &[NonSilentRange]) -> Vec<Segment> {
    let ends: Vec<Centis> = fine.iter().map(NonSilentRange::end_cs).collect();

    for i in 0..segments.len().saturating_sub(1) {
        if segments[i].is_other() || !segments[i + 1].is_other() {
            continue;
        }
        let Some(current_end) = segments[i].end() else {
            continue;
        };
        let next_start = segments[i + 2..].iter().find_map(Segment::start);

        let left = ends.partition_point(|&e| e < current_end);
        let right = match next_start {
            Some(next) => ends.partition_point(|&e| e < next),
            None => ends.len(),
        };

        let new_end = if left < right {
            Some(ends[left])
        } else {
            next_start.and_then(|next| {
                let spans_gap = fine
                    .iter()
                    .take_while(|r| r.start_cs() <= current_end)
                    .any(|r| r.end_cs() >= next);
                spans_gap.then(|| (next - TAIL_GUARD_CS).max(current_end))
            })
        };

        if let (Some(end), Some(span)) = (new_end, segments[i].span.as_mut()) {
            span.end = end;
        }
    }
    segments
}

/// Visual width of `text`: full-width and ambiguous-width characters count 1, the rest 0.5.
pub fn display_width(text: &str) -> f64 {
    text.chars()
        .map(|c| if is_wide(c) { 1.0 } else { 0.5 })
        .sum()
}

/// East Asian Width classes F, W and A (the commonly used blocks).
fn is_wide(c: char) -> bool {
    const RANGES: &[(u32, u32)] = &[
        (0x00A1, 0x00A1),
        (0x00A4, 0x00A4),
        (0x00A7, 0x00A8),
        (0x00AA, 0x00AA),
        (0x00AD, 0x00AE),
        (0x00B0, 0x00B4),
        (0x00B6, 0x00BA),
        (0x00BC, 0x00BF),
        (0x00C6, 0x00C6),
        (0x00D0, 0x00D0),
        (0x00D7, 0x00D8),
        (0x00DE, 0x00E1),
        (0x00E6, 0x00E6),
        (0x00E8, 0x00EA),
        (0x00EC, 0x00ED),
        (0x00F0, 0x00F0),
        (0x00F2, 0x00F3),
        (0x00F7, 0x00FA),
        (0x00FC, 0x00FC),
        (0x00FE, 0x00FE),
        (0x0391, 0x03A9),
        (0x03B1, 0x03C9),
        (0x0401, 0x0401),
        (0x0410, 0x044F),
        (0x0451, 0x0451),
        (0x1100, 0x115F),
        (0x2010, 0x2010),
        (0x2013, 0x2016),
        (0x2018, 0x2019),
        (0x201C, 0x201D),
        (0x2020, 0x2022),
        (0x2024, 0x2027),
        (0x2030, 0x2030),
        (0x2032, 0x2033),
        (0x2035, 0x2035),
        (0x203B, 0x203B),
        (0x203E, 0x203E),
        (0x2460, 0x24E9),
        (0x2500, 0x257F),
        (0x25A0, 0x25FF),
        (0x2605, 0x2606),
        (0x2609, 0x2609),
        (0x260E, 0x260F),
        (0x2640, 0x2640),
        (0x2642, 0x2642),
        (0x2660, 0x266F),
        (0x2E80, 0x303E),
        (0x3041, 0x33FF),
        (0x3400, 0x4DBF),
        (0x4E00, 0x9FFF),
        (0xA000, 0xA4CF),
        (0xAC00, 0xD7A3),
        (0xE000, 0xF8FF),
        (0xF900, 0xFAFF),
        (0xFE30, 0xFE4F),
        (0xFF00, 0xFF60),
        (0xFFE0, 0xFFE6),
        (0xFFFD, 0xFFFD),
        (0x1F300, 0x1F64F),
        (0x1F900, 0x1F9FF),
        (0x20000, 0x2FFFD),
        (0x30000, 0x3FFFD),
    ];

    let c = u32::from(c);
    RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&c))
}

/// Split lines wider than `limit` at whitespace.
///
/// The chosen space is the one whose prefix width is closest to an even split of the line
/// (`width / ceil(width / limit)`), preferring prefixes that fit the limit. The space becomes a
/// newline marker and the remainder is checked again. Lines within the limit are untouched.
pub fn split_long_lines(mut segments: Vec<Segment>, limit: f64) -> Vec<Segment> {
    if limit <= 0.0 {
        return segments;
    }

    let mut width = 0.0;
    let mut spaces: Vec<(usize, f64)> = Vec::new();
    let mut i = 0;

    while i <= segments.len() {
        if i == segments.len() || segments[i].is_newline() {
            if width > limit {
                if let Some(cut) = best_cut(&spaces, width, limit) {
                    segments[cut].surface = "\n".to_string();
                    i = cut;
                }
            }
            width = 0.0;
            spaces.clear();
        } else {
            let seg = &segments[i];
            if seg.is_space() {
                spaces.push((i, width));
            }
            width += display_width(&seg.surface);
        }
        i += 1;
    }
    segments
}

fn best_cut(spaces: &[(usize, f64)], width: f64, limit: f64) -> Option<usize> {
    let ideal = width / (width / limit).ceil();
    let rank = |prefix: f64| {
        if prefix <= limit {
            (0u8, (prefix - ideal).abs())
        } else {
            (1u8, -prefix)
        }
    };

    spaces
        .iter()
        .min_by(|a, b| {
            let (ra, rb) = (rank(a.1), rank(b.1));
            ra.0.cmp(&rb.0).then(ra.1.total_cmp(&rb.1))
        })
        .map(|&(index, _)| index)
}
