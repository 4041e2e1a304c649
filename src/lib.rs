//! # songalign — tag EEG onsets with the song that was playing
//!
//! During a music-listening EEG session two streams are recorded
//! independently: onset events exported from the EEG recorder (`evt.csv`,
//! one row per marker with an `onset_raw` timestamp) and the playback
//! tracker's sample-frame counter (`*_sync.txt`, one row per trigger with a
//! `Frame` and a `TriggerNum`).  `songalign` pairs them up, converts each
//! frame count to seconds of playback and looks the result up in the song
//! schedule.
//!
//! ## Pipeline overview
//!
//! ```text
//! evt.csv            music_pos.txt
//!   │                   │
//!   ├─ filter_trigger   ├─ filter_trigger     rows of one experiment phase
//!   ├─ onset_events     ├─ music_positions    typed views
//!   └────────┬──────────┘
//!            ├─ Aligner::align                frame / sample_rate → seconds
//!            │    └─ SongSchedule::classify   seconds → song name | "idle"
//!            ├─ merge_aligned                 back onto every evt.csv row,
//!            │                                "not found" where unmatched
//!            └─ write_aligned                 evt-aligned.csv
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use songalign::{process_and_align, AlignConfig};
//!
//! let cfg = AlignConfig::default(); // 48 kHz, trigger 9, session song table
//! let out = process_and_align("EEG_BRK2/evt.csv", "recording_sync.txt", &cfg).unwrap();
//! println!("wrote {}", out.display());
//! ```
//!
//! ## Core only
//!
//! ```
//! use songalign::{Aligner, MusicPositionSample, OnsetEvent, SongSchedule};
//!
//! let schedule = SongSchedule::new([("A.wav", 38.0), ("B.wav", 108.0)], 60.0).unwrap();
//! let onsets = [OnsetEvent { onset_raw: 1.0 }, OnsetEvent { onset_raw: 2.0 }];
//! let frames = [
//!     MusicPositionSample { frame: 38.0 * 48_000.0 },
//!     MusicPositionSample { frame: 108.0 * 48_000.0 + 10.0 },
//! ];
//!
//! let records = Aligner::new(&schedule).align(&onsets, &frames, 48_000.0).unwrap();
//! assert_eq!(records[0].song_idx, "A.wav");
//! assert_eq!(records[1].song_idx, "B.wav");
//! ```

pub mod align;
pub mod compose;
pub mod config;
pub mod error;
pub mod merge;
pub mod schedule;
pub mod table;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

// ── Crate-root re-exports ─────────────────────────────────────────────────

// align
pub use align::{align, AlignedRecord, Aligner, MusicPositionSample, OnsetEvent};

// compose
pub use compose::{compose, compose_files, read_mono_wav, write_wav_24, Composite};

// config
pub use config::{AlignConfig, DEFAULT_SONGS};

// error
pub use error::AlignError;

// merge
pub use merge::{aligned_path, merge_aligned, write_aligned, NOT_FOUND};

// schedule
pub use schedule::{SongSchedule, SongSegment, IDLE};

// table
pub use table::{music_positions, onset_events, Table};

/// Align one event file against the music-position file and write
/// `<events>-aligned.<ext>` next to it.
///
/// # Steps
///
/// 1. Validate `cfg` and build its [`SongSchedule`].
/// 2. Read both tables.
/// 3. Keep rows whose trigger column equals [`AlignConfig::trigger_num`]
///    (position rows with an empty trigger are dropped).
/// 4. [`Aligner::align`] the filtered onsets with the filtered frames.
/// 5. [`merge_aligned`] onto the *unfiltered* event table and persist.
///
/// # Errors
///
/// * Invalid sample rate or song table.
/// * Unreadable files or missing / non-numeric columns.
/// * Different numbers of event and position rows after filtering
///   ([`AlignError::LengthMismatch`]); nothing is written in that case.
pub fn process_and_align(
    events_path: impl AsRef<Path>,
    music_pos_path: impl AsRef<Path>,
    cfg: &AlignConfig,
) -> Result<PathBuf> {
    let events_path = events_path.as_ref();
    let music_pos_path = music_pos_path.as_ref();

    // 1. Config.
    cfg.validate()?;
    let schedule = cfg.schedule().context("building song schedule")?;

    // 2. Read.
    let events = Table::read_csv(events_path)?;
    let positions = Table::read_csv(music_pos_path)?;

    // 3. Filter by trigger.
    let ev_sel = events.filter_trigger(&cfg.event_trigger_column, cfg.trigger_num)?;
    let pos_sel = positions.filter_trigger(&cfg.position_trigger_column, cfg.trigger_num)?;
    tracing::info!(
        events = %events_path.display(),
        trigger = cfg.trigger_num,
        onsets = ev_sel.len(),
        positions = pos_sel.len(),
        "selected rows"
    );

    // 4. Align.
    let onsets = onset_events(&ev_sel, &cfg.onset_column)?;
    let frames = music_positions(&pos_sel, &cfg.frame_column)?;
    let records = Aligner::new(&schedule)
        .align(&onsets, &frames, cfg.sample_rate)
        .with_context(|| format!("aligning {}", events_path.display()))?;

    // 5. Merge + persist.
    let merged = merge_aligned(&events, &records, &cfg.onset_column)?;
    write_aligned(events_path, &merged)
}
