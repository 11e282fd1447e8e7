use std::io::Write;

use crate::lyric_encoder::{LyricEncoder, ensure_writable};
use crate::segment::{Centis, Segment};
use crate::timestamp;
use crate::{Error, Result};

/// Reading counts above this are written as this value.
const MAX_READING_COUNT: usize = 9;

/// A `LyricEncoder` that writes RLF-style LRC with inline ruby structures.
///
/// Plain units are `[1|mm:ss:cc]text`, breaks are `[10|mm:ss:cc]text` and ruby groups are
/// `{base|[count|t1]r1[t2]r2...}`.
pub struct RlfEncoder<W: Write> {
    w: W,
    written: bool,
    closed: bool,
}

impl<W: Write> RlfEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            written: false,
            closed: false,
        }
    }
}

impl<W: Write> LyricEncoder for RlfEncoder<W> {
    fn write_document(&mut self, segments: &[Segment]) -> Result<()> {
        ensure_writable(self.written, self.closed)?;

        let body = body(segments)?;
        self.w.write_all(body.as_bytes())?;

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

fn body(segments: &[Segment]) -> Result<String> {
    let mut out = String::new();
    let mut pending_end: Option<Centis> = None;
    let mut i = 0;

    while i < segments.len() {
        let seg = &segments[i];

        if let Some(reading) = seg.kind.reading() {
            if seg.surface.is_empty() {
                return Err(Error::format(
                    reading,
                    "ruby reading is not attached to a base",
                ));
            }

            let mut count = 1;
            let mut structure = format!("{}]{reading}", bare(seg.start()));
            let mut last = seg;
            while let Some(cont) = segments
                .get(i + 1)
                .filter(|s| s.kind.is_ruby() && s.surface.is_empty())
            {
                i += 1;
                count += 1;
                structure.push_str(&format!(
                    "[{}]{}",
                    bare(cont.start()),
                    cont.kind.reading().unwrap_or_default()
                ));
                last = cont;
            }

            let count = count.min(MAX_READING_COUNT);
            out.push_str(&format!("{{{}|[{count}|{structure}}}", seg.surface));
            pending_end = last.end();
        } else if seg.is_plain_text() || (seg.span.is_some() && !is_break(&seg.surface)) {
            match seg.span {
                Some(span) => {
                    out.push_str(&format!("[1|{}]{}", bare(Some(span.start)), seg.surface));
                    pending_end = Some(span.end);
                }
                None => out.push_str(&seg.surface),
            }
        } else if let Some(start) = seg.start() {
            out.push_str(&format!("[10|{}]{}", bare(Some(start)), seg.surface));
            pending_end = None;
        } else if is_break(&seg.surface) && pending_end.is_some() {
            out.push_str(&format!("[10|{}]{}", bare(pending_end.take()), seg.surface));
        } else {
            out.push_str(&seg.surface);
        }

        i += 1;
    }

    if !out.is_empty() {
        if let Some(end) = pending_end {
            out.push_str(&timestamp::lrc(end));
        }
    }
    Ok(out)
}

fn bare(cs: Option<Centis>) -> String {
    cs.map(timestamp::lrc_bare).unwrap_or_default()
}

/// Separators that close the previous unit: line breaks and spaces.
fn is_break(surface: &str) -> bool {
    matches!(surface, "\n" | "" | " " | "\u{3000}")
}
