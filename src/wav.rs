use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec};

use crate::Result;

/// Load a WAV file as mono `f32` samples in `[-1.0, 1.0]`.
///
/// Returns the samples together with the file's sample rate.
pub fn load_mono(path: impl AsRef<Path>) -> Result<(Vec<f32>, u32)> {
    let file = File::open(path.as_ref())?;
    load_mono_from_reader(BufReader::new(file))
}

/// Decode WAV data from a reader and mix it down to mono.
///
/// What we accept:
/// - integer PCM of any bit depth up to 32, and 32-bit float
/// - any channel count (channels are averaged)
/// - any sample rate (returned alongside the samples; nothing is resampled)
pub fn load_mono_from_reader<R: Read>(reader: R) -> Result<(Vec<f32>, u32)> {
    let reader = WavReader::new(reader)?;
    let spec = reader.spec();

    let interleaved = read_normalized(reader, spec)?;
    let channels = usize::from(spec.channels.max(1));
    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    Ok((samples, spec.sample_rate))
}

fn read_normalized<R: Read>(mut reader: WavReader<R>, spec: WavSpec) -> Result<Vec<f32>> {
    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int => {
            // Full scale for a signed sample of this width.
            let scale = (1_i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use hound::WavWriter;

    use super::*;

    fn wav_bytes(spec: WavSpec, write: impl FnOnce(&mut WavWriter<&mut Cursor<Vec<u8>>>)) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            write(&mut writer);
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn mono_i16_is_normalized() -> anyhow::Result<()> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 22_050,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, |w| {
            w.write_sample(i16::MAX).unwrap();
            w.write_sample(0i16).unwrap();
            w.write_sample(i16::MIN).unwrap();
        });

        let (samples, rate) = load_mono_from_reader(bytes.as_slice())?;
        assert_eq!(rate, 22_050);
        assert_eq!(samples.len(), 3);
        assert!((samples[0] - 1.0).abs() < 1e-4);
        assert_eq!(samples[1], 0.0);
        assert_eq!(samples[2], -1.0);
        Ok(())
    }

    #[test]
    fn stereo_is_mixed_down() -> anyhow::Result<()> {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let bytes = wav_bytes(spec, |w| {
            for (l, r) in [(0.5f32, 0.1f32), (-0.2, -0.4)] {
                w.write_sample(l).unwrap();
                w.write_sample(r).unwrap();
            }
        });

        let (samples, rate) = load_mono_from_reader(bytes.as_slice())?;
        assert_eq!(rate, 8_000);
        assert_eq!(samples.len(), 2);
        assert!((samples[0] - 0.3).abs() < 1e-6);
        assert!((samples[1] + 0.3).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(load_mono_from_reader(&b"not a wav"[..]).is_err());
    }
}
