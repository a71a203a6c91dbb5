//! Multichannel WAV reading and writing with planar buffers.

use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV I/O errors.
#[derive(Debug, thiserror::Error)]
pub enum WavError {
    /// Error from the WAV codec.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Requested output bit depth is not 16, 24 or 32.
    #[error("unsupported bit depth: {0} (expected 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    /// Channel buffers of different lengths passed to the writer.
    #[error("channel {channel} has {len} samples, expected {expected}")]
    RaggedChannels {
        /// Offending channel.
        channel: usize,
        /// Its length.
        len: usize,
        /// Length of channel 0.
        expected: usize,
    },
}

/// Result type for WAV operations.
pub type Result<T> = std::result::Result<T, WavError>;

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample. 32 is written as float, 16 and 24 as PCM.
    pub bits_per_sample: u16,
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Read a WAV file into one `Vec<f32>` per channel.
///
/// Integer PCM is scaled to [-1, 1). A trailing partial frame is dropped.
pub fn read_wav_planar<P: AsRef<Path>>(path: P) -> Result<(Vec<Vec<f32>>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let hound_spec = reader.spec();
    let spec = WavSpec::from(hound_spec);
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match hound_spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    Ok((deinterleave(&interleaved, channels), spec))
}

/// Write planar channel buffers. `spec.channels` is taken from `channels`.
pub fn write_wav_planar<P: AsRef<Path>>(
    path: P,
    channels: &[Vec<f32>],
    spec: WavSpec,
) -> Result<()> {
    if !matches!(spec.bits_per_sample, 16 | 24 | 32) {
        return Err(WavError::UnsupportedBitDepth(spec.bits_per_sample));
    }

    let expected = channels.first().map_or(0, Vec::len);
    if let Some((channel, buf)) = channels
        .iter()
        .enumerate()
        .find(|(_, buf)| buf.len() != expected)
    {
        return Err(WavError::RaggedChannels {
            channel,
            len: buf.len(),
            expected,
        });
    }

    let spec = WavSpec {
        channels: channels.len() as u16,
        ..spec
    };
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;

    if spec.bits_per_sample == 32 {
        for frame in 0..expected {
            for buf in channels {
                writer.write_sample(buf[frame])?;
            }
        }
    } else {
        let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
        for frame in 0..expected {
            for buf in channels {
                let int_sample = (buf[frame] * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

fn deinterleave(interleaved: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let frames = interleaved.len() / channels;
    let mut planar = vec![Vec::with_capacity(frames); channels];
    for frame in interleaved.chunks_exact(channels) {
        for (buf, &sample) in planar.iter_mut().zip(frame) {
            buf.push(sample);
        }
    }
    planar
}
