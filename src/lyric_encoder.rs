use crate::segment::Segment;
use crate::{Error, Result};

/// Serializes a fully timed segment sequence into one output document.
///
/// A document is written once; encoders reject a second `write_document` and any write after
/// `close`.
pub trait LyricEncoder {
    fn write_document(&mut self, segments: &[Segment]) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}

/// Shared write-once guard for encoder implementations.
pub(crate) fn ensure_writable(written: bool, closed: bool) -> Result<()> {
    if closed {
        return Err(Error::msg(
            "cannot write document: encoder is already closed",
        ));
    }
    if written {
        return Err(Error::msg(
            "cannot write document: a document was already written",
        ));
    }
    Ok(())
}
