//! Composite stimulus waveform.
//!
//! Places mono song clips on one timeline at their scheduled start offsets,
//! producing the single audio file that was played during the session.  The
//! same schedule is later used by [`crate::schedule`] to classify playback
//! positions.
//!
//! Samples are `i32` holding 24-bit PCM; clips are read with `hound` and
//! the composite is written as mono 24-bit PCM.
use anyhow::{bail, ensure, Context, Result};
use std::path::Path;

/// A composed waveform plus the clips that landed on already-written audio.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    pub samples: Vec<i32>,
    pub sample_rate: u32,
    /// Indices (into the input clips) of clips that overlapped earlier ones.
    pub overlaps: Vec<usize>,
}

/// First sample index of a clip starting at `start_sec`.
pub fn start_sample(start_sec: f64, sample_rate: u32) -> Result<usize> {
    ensure!(
        start_sec.is_finite() && start_sec >= 0.0,
        "clip start {start_sec} s must be finite and >= 0"
    );
    Ok((start_sec * f64::from(sample_rate)) as usize)
}

/// Place `clips[i]` at `starts_sec[i]` seconds on a zero-filled timeline.
///
/// The output is as long as the latest clip end.  Overlapping clips are
/// summed (saturating) and reported.
pub fn compose(clips: &[Vec<i32>], starts_sec: &[f64], sample_rate: u32) -> Result<Composite> {
    ensure!(
        clips.len() == starts_sec.len(),
        "{} clips but {} start offsets",
        clips.len(),
        starts_sec.len()
    );
    ensure!(sample_rate > 0, "sample rate must be > 0");

    let starts = starts_sec
        .iter()
        .map(|&s| start_sample(s, sample_rate))
        .collect::<Result<Vec<_>>>()?;

    let total = starts
        .iter()
        .zip(clips)
        .map(|(&s, clip)| s + clip.len())
        .max()
        .unwrap_or(0);

    let mut samples = vec![0i32; total];
    let mut overlaps = Vec::new();
    for (i, (&start, clip)) in starts.iter().zip(clips).enumerate() {
        let dst = &mut samples[start..start + clip.len()];
        if dst.iter().any(|&v| v != 0) {
            tracing::warn!(
                clip = i,
                at_sec = start as f64 / f64::from(sample_rate),
                "overlap detected"
            );
            overlaps.push(i);
        }
        for (d, &s) in dst.iter_mut().zip(clip) {
            *d = d.saturating_add(s);
        }
    }

    Ok(Composite { samples, sample_rate, overlaps })
}

/// Read a mono WAV file as `i32` samples.  Rejects multichannel files.
///
/// Integer samples are returned at their native bit depth; float samples
/// are scaled to the 24-bit range.
pub fn read_mono_wav(path: impl AsRef<Path>) -> Result<(Vec<i32>, u32)> {
    let path = path.as_ref();
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let spec = reader.spec();
    if spec.channels != 1 {
        bail!("{} has {} channels; clips must be mono", path.display(), spec.channels);
    }

    let samples = match spec.sample_format {
        hound::SampleFormat::Int => reader
            .samples::<i32>()
            .collect::<std::result::Result<Vec<_>, _>>(),
        hound::SampleFormat::Float => {
            const FULL_SCALE: f32 = 8_388_607.0; // 2^23 - 1
            reader
                .samples::<f32>()
                .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * FULL_SCALE) as i32))
                .collect::<std::result::Result<Vec<_>, _>>()
        }
    }
    .with_context(|| format!("decoding {}", path.display()))?;

    Ok((samples, spec.sample_rate))
}

/// Write mono 24-bit PCM.
pub fn write_wav_24(path: impl AsRef<Path>, samples: &[i32], sample_rate: u32) -> Result<()> {
    const MAX: i32 = (1 << 23) - 1;
    const MIN: i32 = -(1 << 23);

    let path = path.as_ref();
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 24,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("creating {}", path.display()))?;
    for &s in samples {
        writer.write_sample(s.clamp(MIN, MAX))?;
    }
    writer
        .finalize()
        .with_context(|| format!("finalizing {}", path.display()))?;
    Ok(())
}

/// Read every clip, check they share one sample rate, and compose them.
pub fn compose_files<P: AsRef<Path>>(clips: &[(P, f64)]) -> Result<Composite> {
    let mut sample_rate = None;
    let mut data = Vec::with_capacity(clips.len());
    let mut starts = Vec::with_capacity(clips.len());

    for (path, start) in clips {
        let path = path.as_ref();
        let (samples, sr) = read_mono_wav(path)?;
        match sample_rate {
            None => {
                tracing::info!(sample_rate = sr, "clip sample rate");
                sample_rate = Some(sr);
            }
            Some(expected) if expected != sr => {
                bail!("sample rate mismatch in {}: expected {expected}, got {sr}", path.display())
            }
            Some(_) => {}
        }
        data.push(samples);
        starts.push(*start);
    }

    let sample_rate = sample_rate.context("no clips to compose")?;
    compose(&data, &starts, sample_rate)
}
