use crate::Result;
use crate::segment::Span;

/// A `(start_seconds, end_seconds)` interval of audio that contains sound.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NonSilentRange {
    pub start: f64,
    pub end: f64,
}

impl NonSilentRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Start in hundredths of a second, truncated.
    pub fn start_cs(&self) -> i64 {
        (self.start * 100.0) as i64
    }

    /// End in hundredths of a second, rounded up.
    pub fn end_cs(&self) -> i64 {
        (self.end * 100.0).ceil() as i64
    }
}

/// Kana-to-Latin transliteration.
///
/// Implementations must be deterministic and return lowercase text.
pub trait Romanizer {
    fn romanize(&self, kana: &str) -> String;
}

/// Whole-line reference reading (morphological tokenizer + transliteration).
///
/// Returning `Ok(None)` means no reference is available for this line and reconciliation is
/// skipped. Errors are treated as fatal for the run.
pub trait Transcriber {
    fn transcript(&self, line_surface: &str) -> Result<Option<String>>;
}

/// English pronouncing dictionary (ARPAbet phonemes, stress digits allowed).
pub trait PronouncingDictionary {
    /// Look up a lowercase word.
    fn lookup(&self, word: &str) -> Option<Vec<String>>;
}

/// Orthographic syllable boundaries for an English word.
pub trait Hyphenator {
    /// Syllables in order. Concatenated, they must spell `word`.
    fn syllabify(&self, word: &str) -> Vec<String>;
}

/// Forced alignment of phonetic tokens against audio.
///
/// The audio is owned by the implementation. The returned list must match `tokens` in length
/// and order.
pub trait ForcedAligner {
    fn align(&self, tokens: &[String], non_silent: &[NonSilentRange]) -> Result<Vec<Span>>;
}

/// Audio non-silence detection. The audio is owned by the implementation.
pub trait NonSilenceDetector {
    fn detect(
        &self,
        frame_seconds: f64,
        threshold_percentile: f64,
        threshold_ratio: f64,
    ) -> Result<Vec<NonSilentRange>>;
}

/// The linguistic collaborators the annotator needs, borrowed for one pass.
#[derive(Clone, Copy)]
pub struct Linguistics<'a> {
    pub romanizer: &'a dyn Romanizer,
    pub dictionary: &'a dyn PronouncingDictionary,
    pub hyphenator: &'a dyn Hyphenator,
}
