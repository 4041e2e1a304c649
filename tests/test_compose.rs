mod common;
use common::scratch_dir;
use songalign::{compose_files, read_mono_wav, write_wav_24};

fn write_clip(path: &std::path::Path, samples: &[i32], sample_rate: u32, channels: u16) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 24,
        sample_format: hound::SampleFormat::Int,
    };
    let mut w = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        w.write_sample(s).unwrap();
    }
    w.finalize().unwrap();
}

#[test]
fn clips_are_placed_and_written() {
    let dir = scratch_dir("compose_place");
    let a = dir.join("a.wav");
    let b = dir.join("b.wav");
    write_clip(&a, &[100, -100, 7], 10, 1);
    write_clip(&b, &[1, 2], 10, 1);

    let c = compose_files(&[(&a, 0.0), (&b, 0.5)]).unwrap();
    assert_eq!(c.sample_rate, 10);
    assert_eq!(c.samples, vec![100, -100, 7, 0, 0, 1, 2]);
    assert!(c.overlaps.is_empty());

    let out = dir.join("combined.wav");
    write_wav_24(&out, &c.samples, c.sample_rate).unwrap();
    let (back, sr) = read_mono_wav(&out).unwrap();
    assert_eq!(sr, 10);
    assert_eq!(back, c.samples);
}

#[test]
fn sample_rate_mismatch_is_an_error() {
    let dir = scratch_dir("compose_sr_mismatch");
    let a = dir.join("a.wav");
    let b = dir.join("b.wav");
    write_clip(&a, &[1], 10, 1);
    write_clip(&b, &[1], 20, 1);

    let err = compose_files(&[(&a, 0.0), (&b, 1.0)]).unwrap_err();
    assert!(err.to_string().contains("sample rate mismatch"), "{err}");
}

#[test]
fn stereo_clip_is_rejected() {
    let dir = scratch_dir("compose_stereo");
    let a = dir.join("a.wav");
    write_clip(&a, &[1, 1, 2, 2], 10, 2);
    assert!(read_mono_wav(&a).is_err());
}

#[test]
fn nothing_to_compose() {
    let clips: [(&std::path::Path, f64); 0] = [];
    assert!(compose_files(&clips).is_err());
}
