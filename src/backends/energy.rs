use crate::Result;
use crate::backend::{NonSilenceDetector, NonSilentRange};

/// RMS-energy non-silence detector over a mono sample buffer.
///
/// Frames are centered (zero padded by half a frame on each side) and spaced half a frame
/// apart. A frame is active when its RMS exceeds
/// `percentile(rms, 100 - threshold_percentile) * threshold_ratio`. Each active run becomes a
/// range padded by a quarter frame on both sides.
#[derive(Debug, Clone)]
pub struct EnergyDetector {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl EnergyDetector {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn rms_frames(&self, frame_length: usize, hop_length: usize) -> Vec<f64> {
        let n = self.samples.len();
        let half = frame_length / 2;
        let frames = 1 + n / hop_length;

        (0..frames)
            .map(|t| {
                let center = t * hop_length;
                let lo = center.saturating_sub(half);
                let hi = (center + frame_length - half).min(n);
                let sum: f64 = self.samples[lo.min(hi)..hi]
                    .iter()
                    .map(|&s| f64::from(s) * f64::from(s))
                    .sum();
                (sum / frame_length as f64).sqrt()
            })
            .collect()
    }
}

impl NonSilenceDetector for EnergyDetector {
    fn detect(
        &self,
        frame_seconds: f64,
        threshold_percentile: f64,
        threshold_ratio: f64,
    ) -> Result<Vec<NonSilentRange>> {
        let frame_length = (f64::from(self.sample_rate) * frame_seconds) as usize;
        if frame_length < 2 {
            return Err(crate::Error::msg(format!(
                "analysis frame of {frame_seconds}s is too short at {} Hz",
                self.sample_rate
            )));
        }
        if self.samples.is_empty() {
            return Ok(Vec::new());
        }

        let hop_length = frame_length / 2;
        let energy = self.rms_frames(frame_length, hop_length);
        let threshold = percentile(&energy, 100.0 - threshold_percentile) * threshold_ratio;
        let frame_time = |t: usize| (t * hop_length) as f64 / f64::from(self.sample_rate);
        let pad = frame_seconds / 4.0;

        let mut ranges = Vec::new();
        let mut start: Option<f64> = None;
        for (t, &rms) in energy.iter().enumerate() {
            let active = rms > threshold;
            match start {
                None if active => start = Some((frame_time(t) - pad).max(0.0)),
                Some(s) if !active => {
                    ranges.push(NonSilentRange::new(s, frame_time(t) + pad));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            ranges.push(NonSilentRange::new(s, frame_time(energy.len() - 1)));
        }

        Ok(ranges)
    }
}

/// Percentile with linear interpolation between closest ranks.
fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
