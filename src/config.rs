//! Alignment configuration.
//!
//! [`AlignConfig`] holds every tunable parameter of the alignment pipeline.
//! The defaults describe the recorded teaching-experiment session: 48 kHz
//! playback, trigger 9, twenty 60 s songs.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AlignError;
use crate::schedule::SongSchedule;

/// Song table of the recorded session, `(file name, start offset in s)`.
///
/// The first clip started 30 s before the playback clock was zeroed.
pub const DEFAULT_SONGS: [(&str, f64); 20] = [
    ("10.wav", -30.0),
    ("9.wav", 38.0),
    ("12.wav", 108.0),
    ("11.wav", 176.0),
    ("14.wav", 247.0),
    ("13.wav", 315.0),
    ("16.wav", 383.0),
    ("15.wav", 460.0),
    ("3.wav", 527.0),
    ("4.wav", 597.0),
    ("1.wav", 666.0),
    ("2.wav", 737.0),
    ("7.wav", 809.0),
    ("8.wav", 875.0),
    ("5.wav", 947.0),
    ("6.wav", 1018.0),
    ("19.wav", 1088.0),
    ("20.wav", 1152.0),
    ("17.wav", 1224.0),
    ("18.wav", 1298.0),
];

/// Configuration for aligning one or more event files.
///
/// All fields are `pub`; override a few with struct-update syntax:
///
/// ```
/// use songalign::AlignConfig;
///
/// let cfg = AlignConfig {
///     trigger_num: 4,
///     sample_rate: 44_100.0,
///     ..AlignConfig::default()
/// };
/// assert!(cfg.validate().is_ok());
/// ```
///
/// Or load a partial JSON file with [`AlignConfig::from_json_file`]; fields
/// missing from the file keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    /// Playback sample rate in Hz used to turn frame counts into seconds.
    ///
    /// Default: `48000.0`.
    pub sample_rate: f64,

    /// Trigger number selecting the experiment phase to align.
    ///
    /// Event rows are kept when [`event_trigger_column`](Self::event_trigger_column)
    /// equals this value, position rows when
    /// [`position_trigger_column`](Self::position_trigger_column) does.
    ///
    /// Default: `9`.
    pub trigger_num: i64,

    /// Length of every song segment in seconds.
    ///
    /// Default: `60.0`.
    pub song_duration: f64,

    /// `(name, start offset in seconds)` for every song.
    ///
    /// Default: [`DEFAULT_SONGS`].
    pub songs: Vec<(String, f64)>,

    /// Onset timestamp column of the event table. Default: `"onset_raw"`.
    pub onset_column: String,
    /// Trigger column of the event table. Default: `"description"`.
    pub event_trigger_column: String,
    /// Frame column of the music-position table. Default: `"Frame"`.
    pub frame_column: String,
    /// Trigger column of the music-position table. Default: `"TriggerNum"`.
    pub position_trigger_column: String,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            trigger_num: 9,
            song_duration: 60.0,
            songs: DEFAULT_SONGS
                .iter()
                .map(|&(name, start)| (name.to_string(), start))
                .collect(),
            onset_column: "onset_raw".into(),
            event_trigger_column: "description".into(),
            frame_column: "Frame".into(),
            position_trigger_column: "TriggerNum".into(),
        }
    }
}

impl AlignConfig {
    /// Read a JSON config. Missing keys fall back to [`AlignConfig::default`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))
    }

    /// Check the parameters the pure steps deliberately tolerate.
    pub fn validate(&self) -> std::result::Result<(), AlignError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(AlignError::InvalidSampleRate(self.sample_rate));
        }
        Ok(())
    }

    /// Build the validated [`SongSchedule`] for [`songs`](Self::songs).
    pub fn schedule(&self) -> std::result::Result<SongSchedule, AlignError> {
        SongSchedule::new(self.songs.iter().cloned(), self.song_duration)
    }
}
