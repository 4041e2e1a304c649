use songalign::{AlignConfig, AlignError, SongSchedule, IDLE};

#[test]
fn idle_before_first_segment() {
    let s = SongSchedule::new([("A.wav", 38.0), ("B.wav", 108.0)], 60.0).unwrap();
    assert_eq!(s.classify(-30.0), IDLE);
    assert_eq!(s.classify(0.0), IDLE);
    assert_eq!(s.classify(37.999), IDLE);
}

#[test]
fn gap_between_songs_is_idle() {
    let s = SongSchedule::new([("A.wav", 38.0), ("B.wav", 108.0)], 60.0).unwrap();
    assert_eq!(s.classify(97.9), "A.wav");
    assert_eq!(s.classify(98.0), IDLE);
    assert_eq!(s.classify(107.9), IDLE);
    assert_eq!(s.classify(108.0), "B.wav");
    assert_eq!(s.classify(168.0), IDLE);
    assert_eq!(s.classify(1e9), IDLE);
}

#[test]
fn classify_is_pure() {
    let s = AlignConfig::default().schedule().unwrap();
    for x in [-100.0, -30.0, 0.0, 45.5, 600.0, 1300.0, 5000.0] {
        assert_eq!(s.classify(x), s.classify(x), "offset {x}");
    }
}

#[test]
fn every_session_song_is_reachable() {
    let cfg = AlignConfig::default();
    let s = cfg.schedule().unwrap();
    for (name, start) in &cfg.songs {
        assert_eq!(s.classify(*start), name.as_str());
        assert_eq!(s.classify(start + 59.5), name.as_str());
    }
}

#[test]
fn segment_at_exposes_bounds() {
    let s = SongSchedule::new([("A", 100.0)], 60.0).unwrap();
    let seg = s.segment_at(130.0).unwrap();
    assert_eq!(seg.start_offset, 100.0);
    assert_eq!(seg.end_offset(), 160.0);
    assert!(s.segment_at(160.0).is_none());
}

#[test]
fn overlapping_config_is_rejected() {
    let cfg = AlignConfig {
        songs: vec![("a.wav".into(), 0.0), ("b.wav".into(), 59.0)],
        ..AlignConfig::default()
    };
    assert!(matches!(cfg.schedule(), Err(AlignError::OverlappingSegments { .. })));
}
