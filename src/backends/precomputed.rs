use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::backend::{ForcedAligner, NonSilentRange, Transcriber};
use crate::segment::Span;
use crate::{Error, Result};

/// A forced aligner that replays timings produced elsewhere.
///
/// The JSON input is an array of `{"start": cs, "end": cs}` objects in token order.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedAligner {
    spans: Vec<Span>,
}

impl PrecomputedAligner {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let spans: Vec<Span> = serde_json::from_reader(reader)?;
        Ok(Self::new(spans))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(std::fs::File::open(path.as_ref())?)
    }
}

impl ForcedAligner for PrecomputedAligner {
    fn align(&self, tokens: &[String], _non_silent: &[NonSilentRange]) -> Result<Vec<Span>> {
        if tokens.len() != self.spans.len() {
            return Err(Error::AlignmentMismatch {
                expected: tokens.len(),
                got: self.spans.len(),
            });
        }
        Ok(self.spans.clone())
    }
}

/// A transcriber backed by a fixed map from line surface to romanized reading.
///
/// Lines missing from the map get no reference, so their readings are left as annotated.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedTranscriber {
    transcripts: HashMap<String, String>,
}

impl PrecomputedTranscriber {
    pub fn new(transcripts: HashMap<String, String>) -> Self {
        Self { transcripts }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let transcripts: HashMap<String, String> = serde_json::from_reader(reader)?;
        Ok(Self::new(transcripts))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(std::fs::File::open(path.as_ref())?)
    }
}

impl Transcriber for PrecomputedTranscriber {
    fn transcript(&self, line_surface: &str) -> Result<Option<String>> {
        Ok(self.transcripts.get(line_surface).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligner_replays_json_timings() -> anyhow::Result<()> {
        let json = r#"[{"start": 10, "end": 20}, {"start": 25, "end": 40}]"#;
        let aligner = PrecomputedAligner::from_reader(json.as_bytes())?;
        let tokens = vec!["ka".to_string(), "ze".to_string()];
        assert_eq!(
            aligner.align(&tokens, &[])?,
            vec![Span::new(10, 20), Span::new(25, 40)]
        );
        Ok(())
    }

    #[test]
    fn aligner_rejects_count_mismatch() -> anyhow::Result<()> {
        let aligner = PrecomputedAligner::new(vec![Span::new(0, 1)]);
        let err = aligner
            .align(&["a".to_string(), "b".to_string()], &[])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::AlignmentMismatch {
                expected: 2,
                got: 1
            }
        ));
        Ok(())
    }

    #[test]
    fn transcriber_looks_up_by_surface() -> anyhow::Result<()> {
        let json = r#"{"阻むものは無い": "habamumonowanai"}"#;
        let transcriber = PrecomputedTranscriber::from_reader(json.as_bytes())?;
        assert_eq!(
            transcriber.transcript("阻むものは無い")?.as_deref(),
            Some("habamumonowanai")
        );
        assert_eq!(transcriber.transcript("other")?, None);
        Ok(())
    }
}
