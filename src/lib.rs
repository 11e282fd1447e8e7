//! `lyricsync`: furigana-annotated lyrics to phonetic tokens and karaoke subtitle documents.
//!
//! This crate provides:
//! - Lyric markup parsing and segment classification (kana, ruby, English, numerals)
//! - Phonetic annotation and reading reconciliation against a reference transcript
//! - Timing reconciliation of forced-alignment output against audio non-silence
//! - Output encoders for Ruby-LRC, RLF-LRC and ASS karaoke scripts
//!
//! External services (forced aligner, morphological transcriber) plug in through the traits in
//! [`backend`]; [`backends`] ships built-in implementations that need no ML runtime.

// High-level API (most consumers should start here).
pub mod lyricsync;
pub mod opts;

pub mod error;

// Core data model.
pub mod segment;

// Text processing.
pub mod classifier;
pub mod english;
pub mod kana;
pub mod markup;
pub mod numeral;

// Pipeline stages.
pub mod annotator;
pub mod reconcile;
pub mod timing;

// Collaborator interfaces and built-in implementations.
pub mod backend;
pub mod backends;

// Audio input.
pub mod wav;

// Output selection and encoder interfaces.
pub mod lyric_encoder;
pub mod output_type;
pub mod timestamp;

// Output encoders that serialize segments into various formats.
pub mod ass_encoder;
pub mod rlf_encoder;
pub mod ruby_lrc_encoder;

// Logging configuration.
#[cfg(feature = "logging")]
pub mod logging;

pub use error::{Error, Result};
pub use lyricsync::LyricSync;
