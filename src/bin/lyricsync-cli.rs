use anyhow::{Context, Result};
use clap::Parser;

use std::io::{self, Write};
use std::path::PathBuf;

use lyricsync::LyricSync;
use lyricsync::backend::NonSilenceDetector;
use lyricsync::backends::{
    CmuDict, EnergyDetector, HepburnRomanizer, PrecomputedAligner, PrecomputedTranscriber,
    VowelGroupHyphenator,
};
use lyricsync::logging;
use lyricsync::markup::LyricFormat;
use lyricsync::opts::{Language, Opts, SilenceOpts, TailCorrect};
use lyricsync::output_type::OutputType;
use lyricsync::timing::alignment_tokens;
use lyricsync::wav::load_mono;

fn main() -> Result<()> {
    logging::init();
    let params = Params::parse();
    let opts = params.opts();

    let lyrics = std::fs::read_to_string(&params.lyrics_path)
        .with_context(|| format!("failed to read lyrics from '{}'", params.lyrics_path.display()))?;

    let sync = build_sync(&params)?;
    let segments = sync.prepare(&lyrics, &opts)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if params.emit_tokens {
        serde_json::to_writer(&mut out, &alignment_tokens(&segments))?;
        writeln!(out)?;
        return Ok(());
    }

    let timings_path = params
        .timings_path
        .as_ref()
        .context("--timings is required unless --emit-tokens is set")?;
    let aligner = PrecomputedAligner::load(timings_path)
        .with_context(|| format!("failed to load timings from '{}'", timings_path.display()))?;

    let detector = match &params.audio_path {
        Some(path) => {
            let (samples, rate) = load_mono(path)
                .with_context(|| format!("failed to decode audio '{}'", path.display()))?;
            Some(EnergyDetector::new(samples, rate))
        }
        None => None,
    };

    let segments = sync.synchronize(
        segments,
        &aligner,
        detector.as_ref().map(|d| d as &dyn NonSilenceDetector),
        &opts,
    )?;
    sync.render_to(&segments, out, &opts, params.output_type)?;
    Ok(())
}

fn build_sync(params: &Params) -> Result<LyricSync> {
    let dictionary = match &params.cmudict_path {
        Some(path) => CmuDict::load(path)
            .with_context(|| format!("failed to load dictionary '{}'", path.display()))?,
        None => CmuDict::builtin(),
    };
    let sync = LyricSync::with_backends(
        HepburnRomanizer::new(),
        dictionary,
        VowelGroupHyphenator::new(),
    );

    match &params.transcripts_path {
        Some(path) => {
            let transcriber = PrecomputedTranscriber::load(path)
                .with_context(|| format!("failed to load transcripts '{}'", path.display()))?;
            Ok(sync.with_transcriber(transcriber))
        }
        None => Ok(sync),
    }
}

#[derive(Parser, Debug)]
#[command(name = "lyricsync")]
#[command(about = "Turn furigana-annotated lyrics into karaoke subtitles")]
struct Params {
    #[arg(short = 'l', long = "lyrics")]
    pub lyrics_path: PathBuf,

    #[arg(short = 'f', long = "format", value_enum, default_value_t = LyricFormat::Plain)]
    pub format: LyricFormat,

    #[arg(long = "language", value_enum, default_value_t = Language::JaEn)]
    pub language: Language,

    /// Print the alignment tokens as JSON and exit.
    #[arg(long = "emit-tokens", default_value_t = false)]
    pub emit_tokens: bool,

    /// Aligner output: a JSON array of `{"start": cs, "end": cs}` in token order.
    #[arg(short = 't', long = "timings")]
    pub timings_path: Option<PathBuf>,

    /// WAV file used for non-silence detection.
    #[arg(short = 'a', long = "audio")]
    pub audio_path: Option<PathBuf>,

    #[arg(long = "cmudict")]
    pub cmudict_path: Option<PathBuf>,

    /// JSON object mapping line text to a romanized reference reading.
    #[arg(long = "transcripts")]
    pub transcripts_path: Option<PathBuf>,

    #[arg(
        short = 'o',
        long = "output-type",
        value_enum,
        default_value_t = OutputType::RubyLrc
    )]
    pub output_type: OutputType,

    #[arg(long = "sokuon-split", default_value_t = false)]
    pub sokuon_split: bool,

    #[arg(long = "hatsuon-split", action = clap::ArgAction::Set, default_value_t = true)]
    pub hatsuon_split: bool,

    #[arg(long = "tail-correct", value_enum, default_value_t = TailCorrect::Rescan)]
    pub tail_correct: TailCorrect,

    /// Playback rate the timings were aligned at; spans are scaled back by this factor.
    #[arg(long = "audio-speed", default_value_t = 1.0)]
    pub audio_speed: f64,

    #[arg(long = "silence-window", default_value_t = 0.8)]
    pub silence_window: f64,

    #[arg(long = "silence-percentile", default_value_t = 10.0)]
    pub silence_percentile: f64,

    #[arg(long = "silence-ratio", default_value_t = 0.1)]
    pub silence_ratio: f64,

    #[arg(long = "ruby-offset-ms", allow_negative_numbers = true, default_value_t = -150)]
    pub ruby_offset_ms: i64,

    /// Countdown tempo; 0 disables the countdown.
    #[arg(long = "bpm", default_value_t = 60.0)]
    pub bpm: f64,

    #[arg(long = "beats-per-bar", default_value_t = 3)]
    pub beats_per_bar: u32,

    /// Split lines wider than this at whitespace; 0 disables splitting.
    #[arg(long = "chars-per-line", default_value_t = 0)]
    pub chars_per_line: u32,

    #[arg(long = "lead-in", default_value_t = 20)]
    pub lead_in_cs: i64,

    #[arg(long = "lead-out", default_value_t = 20)]
    pub lead_out_cs: i64,
}

impl Params {
    fn opts(&self) -> Opts {
        Opts {
            language: self.language,
            lyric_format: self.format,
            sokuon_split: self.sokuon_split,
            hatsuon_split: self.hatsuon_split,
            tail_correct: self.tail_correct,
            silence: SilenceOpts {
                window_seconds: self.silence_window,
                threshold_percentile: self.silence_percentile,
                threshold_ratio: self.silence_ratio,
            },
            audio_speed: self.audio_speed,
            ruby_offset_ms: self.ruby_offset_ms,
            bpm: self.bpm,
            beats_per_bar: self.beats_per_bar,
            chars_per_line: self.chars_per_line,
            lead_in_cs: self.lead_in_cs,
            lead_out_cs: self.lead_out_cs,
        }
    }
}
