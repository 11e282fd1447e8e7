use crate::markup::LyricFormat;

/// Options that control how lyrics are classified, timed and rendered.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// The CLI is responsible for mapping user input into this type so that other frontends
/// (tests, batch jobs) can construct options programmatically.
#[derive(Debug, Clone)]
pub struct Opts {
    /// Which scripts are recognized as pronounceable text.
    pub language: Language,

    /// How the raw lyric text is marked up.
    pub lyric_format: LyricFormat,

    /// Whether geminate kana (っ/ッ) form their own syllable instead of attaching to the previous one.
    pub sokuon_split: bool,

    /// Whether the moraic nasal (ん/ン) forms its own syllable.
    pub hatsuon_split: bool,

    /// Trailing-sound handling around line and word breaks.
    pub tail_correct: TailCorrect,

    /// Non-silence detection thresholds.
    pub silence: SilenceOpts,

    /// Playback rate the aligner's audio was time-stretched to. Aligned spans are scaled back by
    /// this factor onto the original timeline.
    pub audio_speed: f64,

    /// Written as `@Offset=` into the Ruby-LRC document; not applied to timestamps.
    pub ruby_offset_ms: i64,

    /// Tempo used for the countdown marks. `0` disables the countdown.
    pub bpm: f64,

    /// Number of countdown marks (one bar).
    pub beats_per_bar: u32,

    /// Maximum visual width of a line before it is split at whitespace. `0` means unlimited.
    pub chars_per_line: u32,

    /// Karaoke-script lead-in before the first syllable, in hundredths of a second.
    pub lead_in_cs: i64,

    /// Karaoke-script lead-out after the last syllable, in hundredths of a second.
    pub lead_out_cs: i64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            language: Language::JaEn,
            lyric_format: LyricFormat::Plain,
            sokuon_split: false,
            hatsuon_split: true,
            tail_correct: TailCorrect::Rescan,
            silence: SilenceOpts::default(),
            audio_speed: 1.0,
            ruby_offset_ms: -150,
            bpm: 60.0,
            beats_per_bar: 3,
            chars_per_line: 0,
            lead_in_cs: 20,
            lead_out_cs: 20,
        }
    }
}

/// Language profile for plain-text classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Language {
    /// Japanese only: Latin letters are read one by one like kana.
    Ja,

    /// Japanese and English: Latin words are syllabified and numerals expanded.
    #[cfg_attr(feature = "cli", value(name = "ja+en", alias = "jaen"))]
    JaEn,
}

/// Trailing-sound handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum TailCorrect {
    /// Mode 0: leave segment ends exactly as aligned.
    Disabled,

    /// Mode 1: give a break a tail token only when the next sound does not continue the vowel.
    VowelBridge,

    /// Mode 2: give every break after a pronounced segment a tail token.
    Always,

    /// Mode 3: extend segment ends after alignment using a fine non-silence rescan.
    Rescan,
}

impl TailCorrect {
    /// The numeric mode (0 to 3) used in saved settings.
    pub fn mode(self) -> u8 {
        match self {
            Self::Disabled => 0,
            Self::VowelBridge => 1,
            Self::Always => 2,
            Self::Rescan => 3,
        }
    }

    pub fn from_mode(mode: u8) -> Option<Self> {
        match mode {
            0 => Some(Self::Disabled),
            1 => Some(Self::VowelBridge),
            2 => Some(Self::Always),
            3 => Some(Self::Rescan),
            _ => None,
        }
    }
}

/// Thresholds for the audio non-silence detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceOpts {
    /// Analysis window for the coarse pass, in seconds.
    pub window_seconds: f64,

    /// The reference energy is taken at the `100 - threshold_percentile` percentile.
    pub threshold_percentile: f64,

    /// Frames louder than `reference * threshold_ratio` count as non-silent.
    pub threshold_ratio: f64,
}

impl Default for SilenceOpts {
    fn default() -> Self {
        Self {
            window_seconds: 0.8,
            threshold_percentile: 10.0,
            threshold_ratio: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_modes_round_trip_through_numbers() {
        for mode in 0..4 {
            let tail = TailCorrect::from_mode(mode).expect("known mode");
            assert_eq!(tail.mode(), mode);
        }
        assert_eq!(TailCorrect::from_mode(4), None);
    }

    #[test]
    fn defaults_match_recommended_settings() {
        let opts = Opts::default();
        assert_eq!(opts.language, Language::JaEn);
        assert_eq!(opts.tail_correct, TailCorrect::Rescan);
        assert!(opts.hatsuon_split);
        assert!(!opts.sokuon_split);
        assert_eq!(opts.beats_per_bar, 3);
        assert_eq!(opts.audio_speed, 1.0);
    }
}
