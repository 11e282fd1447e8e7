//! Timestamp formatting shared by the lyric encoders.

use crate::segment::Centis;

/// LRC timestamp, `[mm:ss:cc]`. Minutes are not wrapped into hours.
pub fn lrc(cs: Centis) -> String {
    format!("[{}]", lrc_bare(cs))
}

/// LRC timestamp without brackets, `mm:ss:cc`. Negative input clamps to zero.
pub fn lrc_bare(cs: Centis) -> String {
    let cs = cs.max(0);
    format!("{:02}:{:02}:{:02}", cs / 6000, cs % 6000 / 100, cs % 100)
}

/// ASS timestamp, `h:mm:ss.cc`. Negative input clamps to zero.
pub fn ass(cs: Centis) -> String {
    let cs = cs.max(0);
    let h = cs / 360_000;
    let m = cs % 360_000 / 6000;
    let s = cs % 6000 / 100;
    format!("{h}:{m:02}:{s:02}.{:02}", cs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lrc_formats_minutes_seconds_hundredths() {
        assert_eq!(lrc(0), "[00:00:00]");
        assert_eq!(lrc(6_123), "[01:01:23]");
        assert_eq!(lrc(600_000), "[100:00:00]");
        assert_eq!(lrc_bare(154), "00:01:54");
    }

    #[test]
    fn ass_formats_hours() {
        assert_eq!(ass(138), "0:00:01.38");
        assert_eq!(ass(366_105), "1:01:01.05");
    }

    #[test]
    fn negative_times_clamp_to_zero() {
        assert_eq!(lrc(-20), "[00:00:00]");
        assert_eq!(ass(-20), "0:00:00.00");
    }
}
