use std::io::Write;

use crate::Result;
use crate::kana::is_circled_number;
use crate::lyric_encoder::{LyricEncoder, ensure_writable};
use crate::opts::Opts;
use crate::segment::{Centis, Segment, SegmentKind};
use crate::timestamp;

/// Script header written before the dialogue events.
pub const ASS_HEADER: &str = "[Script Info]
ScriptType: v4.00+
YCbCr Matrix: TV.601
PlayResX: 1920
PlayResY: 1080

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Source Han Serif,71,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,1.99999,1.99999,2,11,11,101,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

/// A `LyricEncoder` that writes an ASS karaoke script.
///
/// Design:
/// - One `Dialogue` event per line, padded by the lead-in before the first unit and the
///   lead-out after the last.
/// - Every timed unit gets a `{\k}` tag lasting until the next unit starts, so highlights run
///   back to back.
/// - Ruby is written inline as `base|<reading`, with `#|reading` for further reading syllables.
pub struct AssEncoder<W: Write> {
    w: W,
    lead_in_cs: Centis,
    lead_out_cs: Centis,
    written: bool,
    closed: bool,
}

impl<W: Write> AssEncoder<W> {
    pub fn new(w: W, opts: &Opts) -> Self {
        Self {
            w,
            lead_in_cs: opts.lead_in_cs,
            lead_out_cs: opts.lead_out_cs,
            written: false,
            closed: false,
        }
    }

    fn events(&self, segments: &[Segment]) -> String {
        let mut out = String::new();
        let mut line = KaraokeLine::default();
        let mut i = 0;

        while i < segments.len() {
            let seg = &segments[i];

            // Untimed text before a line's first timed unit is carried over verbatim. A line that
            // never gets a timed unit has no place on the timeline and is dropped.
            let Some(now) = line.now.or_else(|| line.begin(seg)) else {
                if seg.is_newline() {
                    line = KaraokeLine::default();
                } else {
                    line.text.push_str(&seg.surface);
                }
                i += 1;
                continue;
            };

            if seg.is_newline() {
                let end = seg.start().unwrap_or(now);
                out.push_str(&self.dialogue(&line, end));
                line = KaraokeLine::default();
            } else if seg.is_other() && seg.span.is_none() {
                let follows_text = i > 0 && segments[i - 1].is_plain_text();
                if follows_text && !is_gap(&seg.surface) {
                    line.text.push_str(&seg.surface);
                } else {
                    let mut run = seg.surface.clone();
                    let mut duration = 0;
                    while let Some(next) = segments.get(i + 1) {
                        if next.is_newline() {
                            break;
                        }
                        if let Some(start) = next.start() {
                            duration = start - now;
                            line.now = Some(start);
                            break;
                        }
                        run.push_str(&next.surface);
                        i += 1;
                    }
                    line.push_tag(duration, &run);
                }
            } else if let Some(span) = seg.span {
                let next_start = segments.get(i + 1).and_then(Segment::start);
                let until = next_start.unwrap_or(span.end);
                line.now = Some(until);
                line.push_tag(until - span.start, &karaoke_text(seg));
            } else {
                line.text.push_str(&seg.surface);
            }

            i += 1;
        }

        out
    }

    fn dialogue(&self, line: &KaraokeLine, end: Centis) -> String {
        let start = line.start.unwrap_or(end) - self.lead_in_cs;
        let end = end + self.lead_out_cs;
        format!(
            "Dialogue: 0,{},{},Default,,0,0,0,karaoke,{{\\k{}}}{}{{\\k{}}}\n",
            timestamp::ass(start),
            timestamp::ass(end),
            self.lead_in_cs,
            open_with_tag(&line.text),
            self.lead_out_cs,
        )
    }
}

impl<W: Write> LyricEncoder for AssEncoder<W> {
    fn write_document(&mut self, segments: &[Segment]) -> Result<()> {
        ensure_writable(self.written, self.closed)?;

        self.w.write_all(ASS_HEADER.as_bytes())?;
        let events = self.events(segments);
        self.w.write_all(events.as_bytes())?;

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

/// Karaoke text being built for one dialogue line.
#[derive(Debug, Default)]
struct KaraokeLine {
    /// First timed start of the line.
    start: Option<Centis>,
    /// Where the next `\k` tag starts counting from.
    now: Option<Centis>,
    text: String,
}

impl KaraokeLine {
    /// Open the line at `seg` if it is timed.
    fn begin(&mut self, seg: &Segment) -> Option<Centis> {
        let start = seg.start()?;
        self.start = Some(start);
        self.now = Some(start);
        Some(start)
    }

    fn push_tag(&mut self, duration: Centis, text: &str) {
        self.text.push_str(&format!("{{\\k{duration}}}{text}"));
    }
}

fn karaoke_text(seg: &Segment) -> String {
    match &seg.kind {
        SegmentKind::RubyAnchor { reading } | SegmentKind::RubyContinuation { reading } => {
            if seg.surface.is_empty() {
                format!("#|{reading}")
            } else {
                format!("{}|<{reading}", seg.surface)
            }
        }
        _ => seg.surface.clone(),
    }
}

/// Spaces and circled line markers take their own `\k` tag instead of riding on the previous unit.
fn is_gap(surface: &str) -> bool {
    let mut chars = surface.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c == ' ' || c == '\u{3000}' || is_circled_number(c),
        _ => false,
    }
}

/// Make sure the text opens with a `\k` tag, after a leading circled marker if there is one.
fn open_with_tag(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        None | Some('{') => text.to_string(),
        Some(marker) if is_circled_number(marker) => {
            let rest = chars.as_str();
            if rest.starts_with('{') {
                text.to_string()
            } else {
                format!("{marker}{{\\k0}}{rest}")
            }
        }
        Some(_) => format!("{{\\k0}}{text}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Span;

    fn ruby(surface: &str, reading: &str, start: Centis, end: Centis) -> Segment {
        let kind = if surface.is_empty() {
            SegmentKind::RubyContinuation {
                reading: reading.into(),
            }
        } else {
            SegmentKind::RubyAnchor {
                reading: reading.into(),
            }
        };
        let mut seg = Segment::new(surface, kind);
        seg.span = Some(Span::new(start, end));
        seg
    }

    fn kana(surface: &str, start: Centis, end: Centis) -> Segment {
        let mut seg = Segment::new(surface, SegmentKind::Literal);
        seg.span = Some(Span::new(start, end));
        seg
    }

    fn events(segments: &[Segment]) -> String {
        AssEncoder::new(Vec::new(), &Opts::default()).events(segments)
    }

    #[test]
    fn writes_header_and_one_dialogue_per_line() -> anyhow::Result<()> {
        let segments = vec![
            ruby("歌", "う", 138, 140),
            ruby("", "た", 154, 164),
            kana("え", 312, 314),
            Segment::other("\u{3000}"),
            ruby("踊", "お", 335, 337),
            ruby("", "ど", 413, 424),
            kana("れ", 1024, 1054),
            Segment::newline(),
            kana("あ", 1200, 1250),
            Segment::newline(),
        ];

        let mut out = Vec::new();
        let mut enc = AssEncoder::new(&mut out, &Opts::default());
        enc.write_document(&segments)?;
        enc.close()?;
        let doc = String::from_utf8(out)?;

        assert!(doc.starts_with(ASS_HEADER));
        let dialogues: Vec<&str> = doc[ASS_HEADER.len()..].lines().collect();
        assert_eq!(
            dialogues,
            vec![
                "Dialogue: 0,0:00:01.18,0:00:10.74,Default,,0,0,0,karaoke,{\\k20}{\\k16}歌|<う{\\k158}#|た{\\k2}え{\\k21}\u{3000}{\\k78}踊|<お{\\k611}#|ど{\\k30}れ{\\k20}",
                "Dialogue: 0,0:00:11.80,0:00:12.70,Default,,0,0,0,karaoke,{\\k20}{\\k50}あ{\\k20}",
            ]
        );
        Ok(())
    }

    #[test]
    fn punctuation_after_text_rides_on_it() {
        let segments = vec![
            kana("あ", 100, 150),
            Segment::other("、"),
            kana("い", 160, 170),
            Segment::newline(),
        ];
        assert_eq!(
            events(&segments),
            "Dialogue: 0,0:00:00.80,0:00:01.90,Default,,0,0,0,karaoke,{\\k20}{\\k50}あ、{\\k10}い{\\k20}\n"
        );
    }

    #[test]
    fn leading_untimed_text_gets_a_zero_tag() {
        let segments = vec![
            Segment::other("「"),
            kana("あ", 100, 150),
            Segment::newline(),
        ];
        assert!(events(&segments).contains(",karaoke,{\\k20}{\\k0}「{\\k50}あ{\\k20}"));
    }

    #[test]
    fn untimed_line_does_not_leak_into_the_next_event() {
        let segments = vec![
            Segment::other("♪"),
            Segment::other("間"),
            Segment::other("奏"),
            Segment::other("♪"),
            Segment::newline(),
            kana("か", 100, 150),
            kana("な", 160, 200),
            Segment::newline(),
        ];
        let events = events(&segments);
        assert!(events.lines().all(|line| line.starts_with("Dialogue: ")));
        assert_eq!(
            events,
            "Dialogue: 0,0:00:00.80,0:00:02.20,Default,,0,0,0,karaoke,{\\k20}{\\k60}か{\\k40}な{\\k20}\n"
        );
    }

    #[test]
    fn circled_marker_keeps_its_place_before_the_zero_tag() {
        assert_eq!(open_with_tag("①「{\\k5}あ"), "①{\\k0}「{\\k5}あ");
        assert_eq!(open_with_tag("①{\\k5}あ"), "①{\\k5}あ");
        assert_eq!(open_with_tag("{\\k5}あ"), "{\\k5}あ");
        assert_eq!(open_with_tag("「{\\k5}あ"), "{\\k0}「{\\k5}あ");
    }
}
