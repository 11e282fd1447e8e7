/// The supported output documents.
///
/// Each variant maps to one `LyricEncoder` implementation. `ValueEnum` lets the CLI take this
/// enum directly as a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputType {
    /// Line-synced LRC with per-syllable timestamps and an `@Ruby` annotation block.
    RubyLrc,

    /// RhythmicaLyrics-style LRC with inline ruby structures.
    RlfLrc,

    /// Advanced SubStation Alpha karaoke script.
    Ass,
}

impl OutputType {
    /// Conventional file extension for the document.
    pub fn extension(self) -> &'static str {
        match self {
            Self::RubyLrc | Self::RlfLrc => "lrc",
            Self::Ass => "ass",
        }
    }
}
