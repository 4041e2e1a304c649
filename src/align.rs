//! Onset ↔ music-position alignment.
//!
//! The i-th onset event is paired with the i-th music-position sample (both
//! already filtered to the same trigger upstream).  Each sample-frame index
//! becomes a playback-time offset `frame / sample_rate`, which is then
//! classified against a [`SongSchedule`].
use crate::error::{AlignError, Result};
use crate::schedule::{SongSchedule, IDLE};

/// An onset timestamp from the EEG event stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnsetEvent {
    pub onset_raw: f64,
}

/// A raw sample-frame count from the music-playback tracking stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicPositionSample {
    pub frame: f64,
}

/// One onset resolved onto the playback timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRecord {
    pub onset_raw: f64,
    /// Playback-time offset in seconds.
    pub music_pos: f64,
    /// Song name, or [`IDLE`].
    pub song_idx: String,
}

/// Pairs onsets with music positions against a borrowed schedule.
#[derive(Debug, Clone, Copy)]
pub struct Aligner<'a> {
    schedule: &'a SongSchedule,
}

impl<'a> Aligner<'a> {
    pub fn new(schedule: &'a SongSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &'a SongSchedule {
        self.schedule
    }

    /// Produce one [`AlignedRecord`] per `(onset, position)` pair, in input
    /// order.
    ///
    /// Pairing is purely positional, so walking the sequences forward gives
    /// the same records as walking them back-to-front and reversing the
    /// output.
    ///
    /// `sample_rate` is not validated here: zero, negative or non-finite
    /// rates yield offsets that classify as `"idle"` (or as a song, for a
    /// negative offset inside a segment that starts before zero).
    ///
    /// # Errors
    ///
    /// [`AlignError::LengthMismatch`] if the two slices differ in length.
    pub fn align(
        &self,
        onsets: &[OnsetEvent],
        positions: &[MusicPositionSample],
        sample_rate: f64,
    ) -> Result<Vec<AlignedRecord>> {
        if onsets.len() != positions.len() {
            return Err(AlignError::LengthMismatch {
                onsets: onsets.len(),
                positions: positions.len(),
            });
        }

        let records: Vec<AlignedRecord> = onsets
            .iter()
            .zip(positions)
            .map(|(onset, pos)| {
                let music_pos = pos.frame / sample_rate;
                AlignedRecord {
                    onset_raw: onset.onset_raw,
                    music_pos,
                    song_idx: self.schedule.classify(music_pos).to_string(),
                }
            })
            .collect();

        tracing::debug!(
            n = records.len(),
            idle = records.iter().filter(|r| r.song_idx == IDLE).count(),
            "aligned onsets"
        );
        Ok(records)
    }
}

/// Convenience wrapper for a one-off alignment: `Aligner::new(schedule).align(..)`.
pub fn align(
    onsets: &[OnsetEvent],
    positions: &[MusicPositionSample],
    sample_rate: f64,
    schedule: &SongSchedule,
) -> Result<Vec<AlignedRecord>> {
    Aligner::new(schedule).align(onsets, positions, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn schedule() -> SongSchedule {
        SongSchedule::new([("A.wav", 38.0), ("B.wav", 108.0)], 60.0).unwrap()
    }

    fn onsets(v: &[f64]) -> Vec<OnsetEvent> {
        v.iter().map(|&onset_raw| OnsetEvent { onset_raw }).collect()
    }

    fn frames(v: &[f64]) -> Vec<MusicPositionSample> {
        v.iter().map(|&frame| MusicPositionSample { frame }).collect()
    }

    #[test]
    fn two_songs_in_order() {
        let s = schedule();
        let out = Aligner::new(&s)
            .align(
                &onsets(&[1.0, 2.0]),
                &frames(&[38.0 * 48_000.0, 108.0 * 48_000.0 + 10.0]),
                48_000.0,
            )
            .unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].onset_raw, 1.0);
        assert_eq!(out[0].music_pos, 38.0);
        assert_eq!(out[0].song_idx, "A.wav");
        assert_eq!(out[1].onset_raw, 2.0);
        assert_abs_diff_eq!(out[1].music_pos, 108.000_208_333, epsilon = 1e-9);
        assert_eq!(out[1].song_idx, "B.wav");
    }

    #[test]
    fn mismatch_fails() {
        let s = schedule();
        let err = align(&onsets(&[1.0, 2.0]), &frames(&[0.0]), 48_000.0, &s).unwrap_err();
        assert_eq!(err, AlignError::LengthMismatch { onsets: 2, positions: 1 });
    }

    #[test]
    fn empty_is_ok() {
        let s = schedule();
        assert!(align(&[], &[], 48_000.0, &s).unwrap().is_empty());
    }

    #[test]
    fn zero_sample_rate_is_idle() {
        let s = schedule();
        let out = align(&onsets(&[1.0, 2.0]), &frames(&[0.0, 100.0]), 0.0, &s).unwrap();
        // 0/0 = NaN, 100/0 = inf.
        assert!(out[0].music_pos.is_nan());
        assert!(out[1].music_pos.is_infinite());
        assert!(out.iter().all(|r| r.song_idx == "idle"));
    }
}
