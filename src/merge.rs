//! Attach aligned records back onto the full event table and persist it.
//!
//! Every event row gains a `music_pos` and a `song_idx` column.  Rows are
//! matched on exact equality of the parsed onset timestamp; rows without a
//! match (other triggers, unparsable onsets) are kept and marked
//! [`NOT_FOUND`] in both new columns.
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::align::AlignedRecord;
use crate::table::{cell, parse_number, Table};

/// Fill value for event rows with no aligned record.
pub const NOT_FOUND: &str = "not found";

/// Suffix inserted before the extension of the output file.
pub const ALIGNED_SUFFIX: &str = "-aligned";

pub const MUSIC_POS_COLUMN: &str = "music_pos";
pub const SONG_IDX_COLUMN: &str = "song_idx";

/// Left-merge `records` onto `events` by `onset_column`.
///
/// Row count and order of `events` are preserved.  When several records
/// share an onset the first one wins.
pub fn merge_aligned(events: &Table, records: &[AlignedRecord], onset_column: &str) -> Result<Table> {
    let idx = events
        .column_index(onset_column)
        .with_context(|| format!("event table has no '{onset_column}' column"))?;

    // Keyed by bit pattern; -0.0 is folded onto 0.0 so they compare equal
    // as they would with `==`.
    let mut by_onset: HashMap<u64, &AlignedRecord> = HashMap::with_capacity(records.len());
    for rec in records {
        by_onset.entry(onset_key(rec.onset_raw)).or_insert(rec);
    }

    let mut headers = events.headers.clone();
    headers.push(MUSIC_POS_COLUMN.into());
    headers.push(SONG_IDX_COLUMN.into());

    let mut unmatched = 0usize;
    let rows = events
        .rows
        .iter()
        .map(|row| {
            let hit = parse_number(cell(row, idx)).and_then(|v| by_onset.get(&onset_key(v)));
            let mut out = row.clone();
            match hit {
                Some(rec) => {
                    out.push(format_float(rec.music_pos));
                    out.push(rec.song_idx.clone());
                }
                None => {
                    unmatched += 1;
                    out.push(NOT_FOUND.into());
                    out.push(NOT_FOUND.into());
                }
            }
            out
        })
        .collect();

    if unmatched > 0 {
        tracing::warn!(rows = events.len(), unmatched, "event rows without an aligned record");
    } else {
        tracing::debug!(rows = events.len(), "merged aligned records");
    }
    Ok(Table::new(headers, rows))
}

fn onset_key(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}

/// Shortest round-trip representation, always with a fractional part
/// (`38` → `"38.0"`).
pub fn format_float(v: f64) -> String {
    let s = v.to_string();
    if v.is_finite() && !s.contains(['.', 'e', 'E']) {
        format!("{s}.0")
    } else {
        s
    }
}

/// `dir/evt.csv` → `dir/evt-aligned.csv`; `dir/evt` → `dir/evt-aligned`.
pub fn aligned_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let mut name = format!("{stem}{ALIGNED_SUFFIX}");
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    path.with_file_name(name)
}

/// Write `merged` next to `events_path` under its [`aligned_path`].
pub fn write_aligned(events_path: impl AsRef<Path>, merged: &Table) -> Result<PathBuf> {
    let out = aligned_path(events_path);
    merged.write_csv(&out)?;
    tracing::info!(path = %out.display(), rows = merged.len(), "wrote aligned table");
    Ok(out)
}
