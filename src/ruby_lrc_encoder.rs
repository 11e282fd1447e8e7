use std::io::Write;

use crate::Result;
use crate::lyric_encoder::{LyricEncoder, ensure_writable};
use crate::opts::Opts;
use crate::segment::{Centis, Segment, SegmentKind};
use crate::timestamp;

const COUNTDOWN_MARK: char = '●';

/// A `LyricEncoder` that writes line-synced LRC with an `@Ruby` annotation block.
///
/// Each line carries `[mm:ss:cc]` before every timed unit and the line's end time before the
/// break. Ruby groups show only their base text inline; their readings and reading offsets go to
/// the trailing `@RubyN=` entries. Lines after a long gap get a metronome countdown.
pub struct RubyLrcEncoder<W: Write> {
    w: W,
    countdown: Countdown,
    offset_ms: i64,
    written: bool,
    closed: bool,
}

impl<W: Write> RubyLrcEncoder<W> {
    pub fn new(w: W, opts: &Opts) -> Self {
        Self {
            w,
            countdown: Countdown {
                bpm: opts.bpm,
                beats: opts.beats_per_bar,
            },
            offset_ms: opts.ruby_offset_ms,
            written: false,
            closed: false,
        }
    }

    fn main_body(&self, segments: &[Segment]) -> String {
        let mut out = String::new();
        let mut line = String::new();
        let mut pending_end: Option<Centis> = None;
        let mut previous_line_end: Option<Centis> = None;

        for seg in segments {
            if line.is_empty() && !seg.is_other() {
                if let Some(start) = seg.start() {
                    if self.countdown.wanted(start, previous_line_end) {
                        line.push_str(&self.countdown.marks(start));
                    }
                }
            }

            if seg.is_newline() {
                let Some(end) = seg.end().or(pending_end) else {
                    // An untimed line stays open, so the line after it gets no countdown.
                    line.push('\n');
                    continue;
                };
                line.push_str(&timestamp::lrc(end));
                previous_line_end = Some(end);
                line.push('\n');
                out.push_str(&line);
                line.clear();
                pending_end = None;
                continue;
            }

            match (&seg.kind, seg.span) {
                (SegmentKind::Other, Some(span)) => {
                    line.push_str(&timestamp::lrc(span.start));
                    line.push_str(&seg.surface);
                    pending_end = Some(span.end);
                }
                (SegmentKind::Other, None) => {
                    // A space closes the previous unit's highlight.
                    if seg.is_space() {
                        if let Some(end) = pending_end.take() {
                            line.push_str(&timestamp::lrc(end));
                        }
                    }
                    line.push_str(&seg.surface);
                }
                (_, Some(span)) => {
                    if !seg.surface.is_empty() {
                        line.push_str(&timestamp::lrc(span.start));
                        line.push_str(&seg.surface);
                    }
                    pending_end = Some(span.end);
                }
                (_, None) => line.push_str(&seg.surface),
            }
        }

        if let Some(end) = pending_end {
            line.push_str(&timestamp::lrc(end));
        }
        out.push_str(&line);
        if !segments.last().is_some_and(Segment::is_newline) {
            out.push('\n');
        }
        out.push_str(&format!("\n@Offset={}", self.offset_ms));
        out
    }
}

impl<W: Write> LyricEncoder for RubyLrcEncoder<W> {
    fn write_document(&mut self, segments: &[Segment]) -> Result<()> {
        ensure_writable(self.written, self.closed)?;

        let main = self.main_body(segments);
        let ruby = ruby_block(segments);
        write!(&mut self.w, "{main}\n{ruby}")?;

        self.written = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.w.flush()?;
        self.closed = true;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Countdown {
    bpm: f64,
    beats: u32,
}

impl Countdown {
    fn beat_cs(self) -> f64 {
        6000.0 / self.bpm
    }

    /// Whether a line starting at `start` gets a countdown.
    ///
    /// Later lines need a gap longer than one bar plus 4 s. The first line only needs to start
    /// later than one bar plus 1 s.
    fn wanted(self, start: Centis, previous_line_end: Option<Centis>) -> bool {
        if self.bpm <= 0.0 {
            return false;
        }
        let bar = self.beat_cs() * f64::from(self.beats);
        match previous_line_end {
            Some(end) => (start - end) as f64 > bar + 400.0,
            None => start as f64 > bar + 100.0,
        }
    }

    /// `[t-n·b]●...[t-b]●[t]`, clamped at zero.
    fn marks(self, start: Centis) -> String {
        let mut out = String::new();
        for beat in (1..=self.beats).rev() {
            let t = (start as f64 - f64::from(beat) * self.beat_cs()).max(0.0);
            out.push_str(&timestamp::lrc(t.round_ties_even() as Centis));
            out.push(COUNTDOWN_MARK);
        }
        out.push_str(&timestamp::lrc(start));
        out
    }
}

struct RubyEntry {
    base: String,
    readings: String,
    start: Option<Centis>,
    next_start: Option<Centis>,
}

/// `@RubyN=base,reading[Δt]reading...,[start],[next start of the same base]`, one per group.
fn ruby_block(segments: &[Segment]) -> String {
    let mut entries: Vec<RubyEntry> = Vec::new();
    let mut i = 0;

    while i < segments.len() {
        let seg = &segments[i];
        let Some(reading) = seg.kind.reading() else {
            i += 1;
            continue;
        };
        if seg.surface.is_empty() {
            i += 1;
            continue;
        }

        let start = seg.start();
        let mut readings = reading.to_string();
        let mut j = i + 1;
        while let Some(cont) = segments.get(j).filter(|s| is_continuation(s)) {
            if let (Some(first), Some(at)) = (start, cont.start()) {
                readings.push_str(&timestamp::lrc(at - first));
            }
            readings.push_str(cont.kind.reading().unwrap_or_default());
            j += 1;
        }

        if let Some(previous) = entries.iter_mut().rev().find(|e| e.base == seg.surface) {
            previous.next_start = start;
        }
        entries.push(RubyEntry {
            base: seg.surface.clone(),
            readings,
            start,
            next_start: None,
        });
        i = j;
    }

    entries
        .iter()
        .enumerate()
        .map(|(n, e)| {
            format!(
                "@Ruby{}={},{},{},{}",
                n + 1,
                e.base,
                e.readings,
                e.start.map(timestamp::lrc).unwrap_or_default(),
                e.next_start.map(timestamp::lrc).unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_continuation(seg: &Segment) -> bool {
    seg.kind.is_ruby() && seg.surface.is_empty()
}
