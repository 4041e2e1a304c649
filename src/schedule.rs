//! Song schedule: playback-time offset → song name or `"idle"`.
//!
//! A schedule is a list of named segments `[start, start + duration)` sharing
//! one duration, kept sorted by start.  Lookup is a floor query over the
//! start offsets (rightmost insertion point − 1), then a bounds check
//! against the segment end.
use crate::error::{AlignError, Result};

/// Label returned for offsets outside every segment.
pub const IDLE: &str = "idle";

/// One song's slot on the playback timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SongSegment {
    pub name: String,
    /// Seconds since playback start. May be negative.
    pub start_offset: f64,
    pub duration: f64,
}

impl SongSegment {
    pub fn end_offset(&self) -> f64 {
        self.start_offset + self.duration
    }

    pub fn contains(&self, offset: f64) -> bool {
        self.start_offset <= offset && offset < self.end_offset()
    }
}

/// Immutable, validated song table.
///
/// Construction sorts the entries by start offset and rejects tables whose
/// intervals overlap, so every offset maps to at most one song.  Segments
/// that merely touch (`next.start == prev.end`) are accepted.
///
/// ```
/// use songalign::SongSchedule;
///
/// let schedule = SongSchedule::new(
///     [("A.wav", 38.0), ("B.wav", 108.0)],
///     60.0,
/// ).unwrap();
///
/// assert_eq!(schedule.classify(38.0), "A.wav");
/// assert_eq!(schedule.classify(100.0), "idle");
/// assert_eq!(schedule.classify(f64::NAN), "idle");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SongSchedule {
    segments: Vec<SongSegment>,
    duration: f64,
}

impl SongSchedule {
    /// Build a schedule from `(name, start_offset)` pairs and one shared
    /// `duration` in seconds.
    ///
    /// # Errors
    ///
    /// * [`AlignError::InvalidDuration`] for a non-finite or non-positive
    ///   `duration`, even when `songs` is empty.
    /// * [`AlignError::InvalidSegment`] for an empty name or a non-finite
    ///   start.
    /// * [`AlignError::OverlappingSegments`] if two intervals overlap.
    pub fn new<I, S>(songs: I, duration: f64) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(AlignError::InvalidDuration(duration));
        }

        let mut segments = Vec::new();
        for (name, start_offset) in songs {
            let name = name.into();
            if name.is_empty() {
                return Err(AlignError::invalid_segment(&name, "empty name"));
            }
            if !start_offset.is_finite() {
                return Err(AlignError::invalid_segment(
                    &name,
                    format!("start offset {start_offset} is not finite"),
                ));
            }
            segments.push(SongSegment { name, start_offset, duration });
        }

        // Stable: equal starts keep their input order, and are then caught
        // as an overlap below.
        segments.sort_by(|a, b| a.start_offset.total_cmp(&b.start_offset));

        for pair in segments.windows(2) {
            if pair[1].start_offset < pair[0].end_offset() {
                return Err(AlignError::OverlappingSegments {
                    earlier: pair[0].name.clone(),
                    later: pair[1].name.clone(),
                });
            }
        }

        Ok(Self { segments, duration })
    }

    /// Classify a playback-time offset (seconds).
    ///
    /// Returns the name of the segment containing `offset`, or [`IDLE`]
    /// when it precedes the first segment, falls in a gap between songs,
    /// lies past the last song, or is not finite.
    pub fn classify(&self, offset: f64) -> &str {
        self.segment_at(offset).map_or(IDLE, |s| s.name.as_str())
    }

    /// The segment containing `offset`, if any.
    pub fn segment_at(&self, offset: f64) -> Option<&SongSegment> {
        if !offset.is_finite() {
            return None;
        }
        // Number of segments with start <= offset.
        let idx = self.segments.partition_point(|s| s.start_offset <= offset);
        let seg = &self.segments[idx.checked_sub(1)?];
        (offset < seg.end_offset()).then_some(seg)
    }

    /// Segments in ascending start order.
    pub fn segments(&self) -> &[SongSegment] {
        &self.segments
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single() -> SongSchedule {
        SongSchedule::new([("A", 100.0)], 60.0).unwrap()
    }

    #[test]
    fn interval_is_half_open() {
        let s = single();
        assert_eq!(s.classify(99.9), IDLE);
        assert_eq!(s.classify(100.0), "A");
        assert_eq!(s.classify(159.9), "A");
        assert_eq!(s.classify(160.0), IDLE);
    }

    #[test]
    fn non_finite_offsets_are_idle() {
        let s = single();
        assert_eq!(s.classify(f64::NAN), IDLE);
        assert_eq!(s.classify(f64::INFINITY), IDLE);
        assert_eq!(s.classify(f64::NEG_INFINITY), IDLE);
    }

    #[test]
    fn unsorted_input_is_sorted() {
        let s = SongSchedule::new([("B", 108.0), ("A", 38.0)], 60.0).unwrap();
        let names: Vec<_> = s.segments().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(s.classify(50.0), "A");
        assert_eq!(s.classify(110.0), "B");
    }

    #[test]
    fn touching_segments_are_allowed() {
        let s = SongSchedule::new([("A", 0.0), ("B", 60.0)], 60.0).unwrap();
        assert_eq!(s.classify(59.999), "A");
        assert_eq!(s.classify(60.0), "B");
    }

    #[test]
    fn overlap_is_rejected() {
        let err = SongSchedule::new([("A", 0.0), ("B", 30.0)], 60.0).unwrap_err();
        assert_eq!(
            err,
            AlignError::OverlappingSegments { earlier: "A".into(), later: "B".into() }
        );
    }

    #[test]
    fn duplicate_start_is_an_overlap() {
        let err = SongSchedule::new([("A", 10.0), ("B", 10.0)], 5.0).unwrap_err();
        assert!(matches!(err, AlignError::OverlappingSegments { .. }));
    }

    #[test]
    fn bad_segments_are_rejected() {
        assert!(matches!(
            SongSchedule::new([("A", f64::NAN)], 60.0),
            Err(AlignError::InvalidSegment { .. })
        ));
        assert!(matches!(
            SongSchedule::new([("", 0.0)], 60.0),
            Err(AlignError::InvalidSegment { .. })
        ));
    }

    #[test]
    fn bad_duration_is_rejected_before_segments() {
        let none = Vec::<(String, f64)>::new;
        assert_eq!(SongSchedule::new(none(), -5.0), Err(AlignError::InvalidDuration(-5.0)));
        assert_eq!(SongSchedule::new(none(), 0.0), Err(AlignError::InvalidDuration(0.0)));
        assert!(matches!(
            SongSchedule::new(none(), f64::NAN),
            Err(AlignError::InvalidDuration(d)) if d.is_nan()
        ));
        // Reported as a duration problem, not against the first song.
        assert_eq!(
            SongSchedule::new([("A", 0.0)], f64::INFINITY),
            Err(AlignError::InvalidDuration(f64::INFINITY))
        );
    }

    #[test]
    fn empty_schedule_is_always_idle() {
        let s = SongSchedule::new(Vec::<(String, f64)>::new(), 60.0).unwrap();
        assert!(s.is_empty());
        assert_eq!(s.classify(0.0), IDLE);
    }
}
