//! High-level API for turning lyrics into synced karaoke documents.
//!
//! `LyricSync` is the single entry point that wires the lower-level stages together:
//! markup → classification → phonetic annotation → (optional) reconciliation → tail tokens,
//! then alignment → boundary snapping → tail extension → line splitting, then one encoder.
//!
//! The stages stay separately testable in their own modules; this type only owns the long-lived
//! linguistic collaborators and decides which stages run for a given `Opts`.

use std::io::{BufWriter, Write};

use tracing::debug;

use crate::annotator::annotate;
use crate::ass_encoder::AssEncoder;
use crate::backend::{
    ForcedAligner, Hyphenator, Linguistics, NonSilenceDetector, PronouncingDictionary, Romanizer,
    Transcriber,
};
use crate::backends::{CmuDict, HepburnRomanizer, VowelGroupHyphenator};
use crate::classifier::{ClassifyOpts, classify_lyrics};
use crate::lyric_encoder::LyricEncoder;
use crate::markup;
use crate::opts::{Opts, TailCorrect};
use crate::output_type::OutputType;
use crate::reconcile::reconcile;
use crate::rlf_encoder::RlfEncoder;
use crate::ruby_lrc_encoder::RubyLrcEncoder;
use crate::segment::Segment;
use crate::timing::{
    alignment_tokens, apply_alignment, assign_tail_tokens, extend_tails, rescale_spans,
    snap_to_non_silence, split_long_lines,
};
use crate::{Error, Result};

/// Analysis window of the fine non-silence pass used for tail extension, in seconds.
pub const RESCAN_WINDOW_SECONDS: f64 = 0.02;

/// The main lyric synchronization entry point.
///
/// `LyricSync` owns the collaborators that do not depend on a particular song:
/// - a kana romanizer
/// - an English pronouncing dictionary and hyphenator
/// - an optional whole-line transcriber used to correct particle readings
///
/// Audio-bound collaborators (aligner, non-silence detector) are passed per call since they
/// own one recording each.
pub struct LyricSync {
    romanizer: Box<dyn Romanizer>,
    dictionary: Box<dyn PronouncingDictionary>,
    hyphenator: Box<dyn Hyphenator>,
    transcriber: Option<Box<dyn Transcriber>>,
}

impl Default for LyricSync {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricSync {
    /// Create a `LyricSync` using the built-in backends and no transcriber.
    pub fn new() -> Self {
        Self::with_backends(
            HepburnRomanizer::new(),
            CmuDict::builtin(),
            VowelGroupHyphenator::new(),
        )
    }

    /// Create a `LyricSync` using custom linguistic backends.
    pub fn with_backends(
        romanizer: impl Romanizer + 'static,
        dictionary: impl PronouncingDictionary + 'static,
        hyphenator: impl Hyphenator + 'static,
    ) -> Self {
        Self {
            romanizer: Box::new(romanizer),
            dictionary: Box::new(dictionary),
            hyphenator: Box::new(hyphenator),
            transcriber: None,
        }
    }

    /// Enable reading reconciliation against `transcriber`.
    pub fn with_transcriber(mut self, transcriber: impl Transcriber + 'static) -> Self {
        self.transcriber = Some(Box::new(transcriber));
        self
    }

    fn linguistics(&self) -> Linguistics<'_> {
        Linguistics {
            romanizer: self.romanizer.as_ref(),
            dictionary: self.dictionary.as_ref(),
            hyphenator: self.hyphenator.as_ref(),
        }
    }

    /// Parse lyric text into annotated segments ready for alignment.
    ///
    /// Fails with a `Format` error on malformed ruby markup, or when the text has no lyric lines.
    pub fn prepare(&self, text: &str, opts: &Opts) -> Result<Vec<Segment>> {
        let lines = markup::normalize(text, opts.lyric_format);
        let segments = classify_lyrics(&lines, ClassifyOpts::from(opts))?;
        if segments.is_empty() {
            return Err(Error::msg("lyrics contain no lines"));
        }

        let segments = annotate(segments, self.linguistics());
        let segments = match &self.transcriber {
            Some(transcriber) => reconcile(segments, transcriber.as_ref())?,
            None => segments,
        };
        let segments = assign_tail_tokens(segments, opts.tail_correct);

        debug!(
            lines = lines.len(),
            segments = segments.len(),
            "prepared lyrics"
        );
        Ok(segments)
    }

    /// Time prepared segments against the audio behind `aligner` and `detector`.
    ///
    /// Without a detector, boundary snapping and tail extension are skipped and the aligner sees
    /// an empty non-silence list. Aligned spans are scaled by `opts.audio_speed` first.
    pub fn synchronize(
        &self,
        segments: Vec<Segment>,
        aligner: &dyn ForcedAligner,
        detector: Option<&dyn NonSilenceDetector>,
        opts: &Opts,
    ) -> Result<Vec<Segment>> {
        let silence = opts.silence;
        let coarse = match detector {
            Some(detector) => detector.detect(
                silence.window_seconds,
                silence.threshold_percentile,
                silence.threshold_ratio,
            )?,
            None => Vec::new(),
        };

        let tokens = alignment_tokens(&segments);
        let spans = rescale_spans(aligner.align(&tokens, &coarse)?, opts.audio_speed)?;
        let segments = apply_alignment(segments, spans)?;
        let segments = snap_to_non_silence(segments, &coarse);

        let segments = match (opts.tail_correct, detector) {
            (TailCorrect::Rescan, Some(detector)) => {
                let fine = detector.detect(
                    RESCAN_WINDOW_SECONDS,
                    silence.threshold_percentile,
                    silence.threshold_ratio,
                )?;
                extend_tails(segments, &fine)
            }
            _ => segments,
        };

        if opts.chars_per_line > 0 {
            Ok(split_long_lines(segments, f64::from(opts.chars_per_line)))
        } else {
            Ok(segments)
        }
    }

    /// Render timed segments as one document and write it to `w`.
    pub fn render_to<W: Write>(
        &self,
        segments: &[Segment],
        w: W,
        opts: &Opts,
        output_type: OutputType,
    ) -> Result<()> {
        // Buffer output for efficiency (especially important for stdout).
        let writer = BufWriter::new(w);

        // Kept explicit (no trait objects) so each encoder is closed on every path.
        match output_type {
            OutputType::RubyLrc => encode_with(RubyLrcEncoder::new(writer, opts), segments),
            OutputType::RlfLrc => encode_with(RlfEncoder::new(writer), segments),
            OutputType::Ass => encode_with(AssEncoder::new(writer, opts), segments),
        }
    }

    /// Render timed segments as one document.
    pub fn render(
        &self,
        segments: &[Segment],
        opts: &Opts,
        output_type: OutputType,
    ) -> Result<String> {
        let mut buf = Vec::new();
        self.render_to(segments, &mut buf, opts, output_type)?;
        String::from_utf8(buf).map_err(|err| Error::Other(Box::new(err)))
    }

    /// Prepare, synchronize and render in one call.
    pub fn run(
        &self,
        text: &str,
        aligner: &dyn ForcedAligner,
        detector: Option<&dyn NonSilenceDetector>,
        opts: &Opts,
        output_type: OutputType,
    ) -> Result<String> {
        let segments = self.prepare(text, opts)?;
        let segments = self.synchronize(segments, aligner, detector, opts)?;
        self.render(&segments, opts, output_type)
    }
}

fn encode_with<E: LyricEncoder>(mut encoder: E, segments: &[Segment]) -> Result<()> {
    let run_res = encoder.write_document(segments);
    merge_run_and_close(run_res, encoder.close())
}

fn merge_run_and_close(run_res: Result<()>, close_res: Result<()>) -> Result<()> {
    match (run_res, close_res) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => Err(Error::msg(format!(
            "{err} (closing the encoder also failed: {close_err})"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::PrecomputedAligner;
    use crate::segment::{SegmentKind, Span};

    fn no_tails() -> Opts {
        Opts {
            tail_correct: TailCorrect::Disabled,
            ..Opts::default()
        }
    }

    #[test]
    fn prepare_classifies_and_annotates() -> anyhow::Result<()> {
        let sync = LyricSync::new();
        let segments = sync.prepare("{歌|うた}え\n", &no_tails())?;

        let prons: Vec<&str> = segments.iter().map(|s| s.pronunciation.as_str()).collect();
        assert_eq!(prons, vec!["u", "ta", "e", ""]);
        assert!(matches!(segments[0].kind, SegmentKind::RubyAnchor { .. }));
        assert!(segments[3].is_newline());
        Ok(())
    }

    #[test]
    fn empty_lyrics_are_rejected() {
        let sync = LyricSync::new();
        assert!(sync.prepare("\n  \n", &Opts::default()).is_err());
    }

    #[test]
    fn synchronize_without_a_detector_keeps_aligned_spans() -> anyhow::Result<()> {
        let sync = LyricSync::new();
        let opts = no_tails();
        let segments = sync.prepare("かな\n", &opts)?;
        let aligner = PrecomputedAligner::new(vec![Span::new(10, 20), Span::new(30, 40)]);

        let timed = sync.synchronize(segments, &aligner, None, &opts)?;
        assert_eq!(timed[0].span, Some(Span::new(10, 20)));
        assert_eq!(timed[1].span, Some(Span::new(30, 40)));
        assert_eq!(timed[2].span, None);
        Ok(())
    }

    #[test]
    fn spans_from_sped_up_audio_land_on_the_original_timeline() -> anyhow::Result<()> {
        let sync = LyricSync::new();
        let opts = Opts {
            audio_speed: 2.0,
            ..no_tails()
        };
        let segments = sync.prepare("かな\n", &opts)?;
        let aligner = PrecomputedAligner::new(vec![Span::new(10, 20), Span::new(30, 40)]);

        let timed = sync.synchronize(segments, &aligner, None, &opts)?;
        assert_eq!(timed[0].span, Some(Span::new(20, 40)));
        assert_eq!(timed[1].span, Some(Span::new(60, 80)));
        Ok(())
    }

    #[test]
    fn mismatched_timings_are_fatal() -> anyhow::Result<()> {
        let sync = LyricSync::new();
        let opts = no_tails();
        let segments = sync.prepare("かな\n", &opts)?;
        let aligner = PrecomputedAligner::new(vec![Span::new(10, 20)]);

        let err = sync
            .synchronize(segments, &aligner, None, &opts)
            .unwrap_err();
        assert!(matches!(err, Error::AlignmentMismatch { expected: 2, got: 1 }));
        Ok(())
    }

    #[test]
    fn render_closes_on_format_errors() {
        let mut orphan = Segment::new(
            "",
            SegmentKind::RubyContinuation {
                reading: "た".into(),
            },
        );
        orphan.span = Some(Span::new(0, 10));

        let sync = LyricSync::new();
        let err = sync
            .render(&[orphan], &Opts::default(), OutputType::RlfLrc)
            .unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }
}
