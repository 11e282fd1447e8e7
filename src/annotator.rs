//! Phonetic annotation: a canonical romanized pronunciation for every segment.
//!
//! Annotation runs in two passes over the classified sequence:
//! - English words are split into syllable segments and numerals are spelled out.
//! - Kana, ruby readings and literals are romanized right to left, so a trailing geminate
//!   can borrow the onset of whatever follows it.

use tracing::warn;

use crate::backend::{Linguistics, Romanizer};
use crate::english::WordPhonetics;
use crate::kana::{GEMINATE, is_latin};
use crate::numeral;
use crate::segment::{Segment, SegmentKind};

/// Pronunciation used where no sound can be derived: an unparsable numeral, or a geminate with
/// nothing after it. Empty targets are skipped by the reconciler and never reach the aligner.
pub const TAIL_SYMBOL: &str = "";

/// Fill in `pronunciation` for every segment.
///
/// `LatinWord` segments are expanded into one segment per syllable, so the returned sequence can
/// be longer than the input. Nothing is reordered or dropped.
pub fn annotate(segments: Vec<Segment>, linguistics: Linguistics<'_>) -> Vec<Segment> {
    let phonetics = WordPhonetics::new(linguistics.dictionary, linguistics.hyphenator);
    let mut segments = expand_english(segments, &phonetics);
    romanize_readings(&mut segments, linguistics.romanizer);
    segments
}

fn expand_english(segments: Vec<Segment>, phonetics: &WordPhonetics<'_>) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());
    for seg in segments {
        match &seg.kind {
            SegmentKind::LatinWord => {
                for (surface, pronunciation) in phonetics.syllables(&seg.surface) {
                    let mut syllable = Segment::new(surface, SegmentKind::LatinWord);
                    syllable.pronunciation = pronunciation;
                    out.push(syllable);
                }
            }
            SegmentKind::Numeral => {
                let pronunciation = pronounce_numeral(&seg.surface, phonetics);
                out.push(Segment {
                    pronunciation,
                    ..seg
                });
            }
            _ => out.push(seg),
        }
    }
    out
}

/// The pronunciation of a numeral run, its English words run together.
///
/// The surface is left alone; only the reading is expanded.
pub fn pronounce_numeral(text: &str, phonetics: &WordPhonetics<'_>) -> String {
    let plain = numeral::normalize(text);
    let Some(words) = numeral::number_to_english(&plain) else {
        warn!(numeral = text, "unable to read numeral; leaving it silent");
        return TAIL_SYMBOL.to_string();
    };

    words
        .split_whitespace()
        .map(|word| phonetics.pronounce(word))
        .collect()
}

fn romanize_readings(segments: &mut [Segment], romanizer: &dyn Romanizer) {
    let mut following: Option<String> = None;

    for seg in segments.iter_mut().rev() {
        match &seg.kind {
            SegmentKind::RubyAnchor { reading } | SegmentKind::RubyContinuation { reading } => {
                seg.pronunciation = romanize_unit(reading, following.as_deref(), romanizer);
            }
            SegmentKind::Literal => {
                let text = if is_latin(&seg.surface) {
                    seg.surface.to_lowercase()
                } else {
                    seg.surface.clone()
                };
                seg.pronunciation = romanize_unit(&text, following.as_deref(), romanizer);
            }
            SegmentKind::Other => seg.pronunciation = TAIL_SYMBOL.to_string(),
            SegmentKind::LatinWord | SegmentKind::Numeral => {}
        }
        following = Some(seg.pronunciation.clone());
    }
}

/// Romanize one kana unit. A trailing geminate doubles the next sound's onset.
fn romanize_unit(text: &str, following: Option<&str>, romanizer: &dyn Romanizer) -> String {
    let Some(stem) = text.strip_suffix(GEMINATE) else {
        return romanizer.romanize(text);
    };

    let onset = match following.and_then(|p| p.chars().next()) {
        Some('c') => "t".to_string(),
        Some(c) => c.to_string(),
        None => TAIL_SYMBOL.to_string(),
    };
    format!("{}{onset}", romanizer.romanize(stem))
}
