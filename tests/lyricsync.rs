use std::collections::HashMap;

use anyhow::Result;
use hound::{SampleFormat, WavSpec, WavWriter};

use lyricsync::LyricSync;
use lyricsync::backend::NonSilenceDetector;
use lyricsync::backends::{EnergyDetector, PrecomputedAligner, PrecomputedTranscriber};
use lyricsync::markup::LyricFormat;
use lyricsync::opts::{Opts, TailCorrect};
use lyricsync::output_type::OutputType;
use lyricsync::segment::Span;
use lyricsync::timing::alignment_tokens;
use lyricsync::wav::load_mono;

const SONG: &str = "{歌|うた}え\u{3000}{踊|おど}れ\n";

fn opts(tail_correct: TailCorrect) -> Opts {
    Opts {
        tail_correct,
        ..Opts::default()
    }
}

fn song_timings() -> PrecomputedAligner {
    PrecomputedAligner::new(vec![
        Span::new(138, 140),
        Span::new(154, 164),
        Span::new(312, 314),
        Span::new(335, 337),
        Span::new(413, 424),
        Span::new(1024, 1054),
    ])
}

/// 2 s of silence, 2 s of tone, 2 s of silence at 1 kHz.
fn sound_between_silences() -> Vec<i16> {
    let mut samples = vec![0i16; 2000];
    samples.extend((0..2000).map(|i| ((i as f32 * 0.3).sin() * 16_000.0) as i16));
    samples.extend(vec![0i16; 2000]);
    samples
}

#[test]
fn particle_reading_follows_the_reference() -> Result<()> {
    let transcripts = HashMap::from([(
        "阻むものは無い".to_string(),
        "habamumonowanai".to_string(),
    )]);
    let sync = LyricSync::new().with_transcriber(PrecomputedTranscriber::new(transcripts));

    let segments = sync.prepare("{阻|はば}むものは{無|な}い\n", &opts(TailCorrect::Disabled))?;
    assert_eq!(
        alignment_tokens(&segments),
        vec!["ha", "ba", "mu", "mo", "no", "wa", "na", "i"]
    );
    Ok(())
}

#[test]
fn readings_stay_without_a_reference() -> Result<()> {
    let sync = LyricSync::new().with_transcriber(PrecomputedTranscriber::default());

    let segments = sync.prepare("{阻|はば}むものは{無|な}い\n", &opts(TailCorrect::Disabled))?;
    assert_eq!(alignment_tokens(&segments)[5], "ha");
    Ok(())
}

#[test]
fn always_mode_gives_line_ends_a_tail_token() -> Result<()> {
    let sync = LyricSync::new();
    let segments = sync.prepare("かな\n", &opts(TailCorrect::Always))?;
    assert_eq!(alignment_tokens(&segments), vec!["ka", "na", "ah"]);
    Ok(())
}

#[test]
fn numerals_are_read_in_english() -> Result<()> {
    let sync = LyricSync::new();
    let segments = sync.prepare("7\n", &opts(TailCorrect::Disabled))?;
    assert_eq!(alignment_tokens(&segments), vec!["sevan"]);
    Ok(())
}

#[test]
fn moegirl_source_is_normalized_before_classification() -> Result<()> {
    let sync = LyricSync::new();
    let opts = Opts {
        lyric_format: LyricFormat::Moegirl,
        tail_correct: TailCorrect::Disabled,
        ..Opts::default()
    };
    let segments = sync.prepare("|header\n{{Photrans|歌|うた}}え\n", &opts)?;
    assert_eq!(alignment_tokens(&segments), vec!["u", "ta", "e"]);
    assert_eq!(segments[0].surface, "歌");
    Ok(())
}

#[test]
fn renders_every_document_type() -> Result<()> {
    let sync = LyricSync::new();
    let opts = opts(TailCorrect::Disabled);
    let segments = sync.prepare(SONG, &opts)?;
    let segments = sync.synchronize(segments, &song_timings(), None, &opts)?;

    let ruby_lrc = sync.render(&segments, &opts, OutputType::RubyLrc)?;
    assert_eq!(
        ruby_lrc,
        concat!(
            "[00:01:38]歌[00:03:12]え[00:03:14]\u{3000}[00:03:35]踊[00:10:24]れ[00:10:54]\n",
            "\n@Offset=-150\n",
            "@Ruby1=歌,う[00:00:16]た,[00:01:38],\n",
            "@Ruby2=踊,お[00:00:78]ど,[00:03:35],",
        )
    );

    let rlf = sync.render(&segments, &opts, OutputType::RlfLrc)?;
    assert_eq!(
        rlf,
        concat!(
            "{歌|[2|00:01:38]う[00:01:54]た}[1|00:03:12]え[10|00:03:14]\u{3000}",
            "{踊|[2|00:03:35]お[00:04:13]ど}[1|00:10:24]れ[10|00:10:54]\n",
        )
    );

    let ass = sync.render(&segments, &opts, OutputType::Ass)?;
    assert!(ass.starts_with("[Script Info]"));
    assert!(ass.ends_with(
        "Dialogue: 0,0:00:01.18,0:00:10.74,Default,,0,0,0,karaoke,{\\k20}{\\k16}歌|<う{\\k158}#|た{\\k2}え{\\k21}\u{3000}{\\k78}踊|<お{\\k611}#|ど{\\k30}れ{\\k20}\n"
    ));
    Ok(())
}

#[test]
fn run_chains_every_stage() -> Result<()> {
    let sync = LyricSync::new();
    let opts = opts(TailCorrect::Disabled);
    let doc = sync.run(SONG, &song_timings(), None, &opts, OutputType::RlfLrc)?;
    assert!(doc.starts_with("{歌|[2|00:01:38]う"));
    Ok(())
}

#[test]
fn wav_audio_drives_boundary_snap_and_tail_extension() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("song.wav");
    let spec = WavSpec {
        channels: 1,
        sample_rate: 1000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec)?;
    for sample in sound_between_silences() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    let (samples, rate) = load_mono(&path)?;
    assert_eq!(rate, 1000);
    assert_eq!(samples.len(), 6000);
    let detector = EnergyDetector::new(samples, rate);

    let coarse = detector.detect(0.8, 10.0, 0.1)?;
    assert_eq!(coarse.len(), 1);

    let sync = LyricSync::new();
    let opts = opts(TailCorrect::Rescan);
    let segments = sync.prepare("かな\n", &opts)?;
    let aligner = PrecomputedAligner::new(vec![Span::new(100, 250), Span::new(260, 300)]);
    let timed = sync.synchronize(
        segments,
        &aligner,
        Some(&detector as &dyn NonSilenceDetector),
        &opts,
    )?;

    // The phrase start moves into the sounding region.
    let ka = timed[0].span.expect("ka is timed");
    assert!((175..=185).contains(&ka.start), "start {}", ka.start);
    assert_eq!(ka.end, 250);

    // The line-final syllable is stretched to where the tone fades.
    let na = timed[1].span.expect("na is timed");
    assert_eq!(na.start, 260);
    assert!((400..=405).contains(&na.end), "end {}", na.end);
    Ok(())
}

#[test]
fn malformed_ruby_is_a_format_error() {
    let sync = LyricSync::new();
    let err = sync
        .prepare("{歌|う|た}\n", &Opts::default())
        .unwrap_err();
    assert!(matches!(err, lyricsync::Error::Format { .. }));
}
