/// compose: build the composite stimulus WAV from the song schedule.
///
/// Every song in the schedule is read from `--clips-dir/<name>` (mono WAV,
/// one shared sample rate) and placed at its start offset.  Songs with a
/// negative start are skipped: the composite starts at playback time zero.
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use songalign::{compose_files, write_wav_24, AlignConfig};

#[derive(Parser, Debug)]
#[command(name = "compose")]
struct Args {
    /// Directory containing the song clips.
    #[arg(long, default_value = "MusicSti-Cropped")]
    clips_dir: PathBuf,

    /// Output WAV path (mono, 24-bit PCM).
    #[arg(long, default_value = "combined_songs.wav")]
    output: PathBuf,

    /// JSON config providing the song table (default: session table).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let cfg = match &args.config {
        Some(path) => AlignConfig::from_json_file(path)?,
        None => AlignConfig::default(),
    };
    // Sorted and overlap-checked.
    let schedule = cfg.schedule()?;

    let mut clips = Vec::with_capacity(schedule.len());
    for seg in schedule.segments() {
        if seg.start_offset < 0.0 {
            tracing::warn!(song = %seg.name, start = seg.start_offset, "negative start, skipped");
            continue;
        }
        clips.push((args.clips_dir.join(&seg.name), seg.start_offset));
    }

    let composite = compose_files(&clips)?;
    write_wav_24(&args.output, &composite.samples, composite.sample_rate)?;

    eprintln!(
        "Combined {} clips ({:.1} s @ {} Hz) → {}",
        clips.len(),
        composite.samples.len() as f64 / f64::from(composite.sample_rate),
        composite.sample_rate,
        args.output.display()
    );
    if !composite.overlaps.is_empty() {
        eprintln!("  {} clip(s) overlapped earlier audio", composite.overlaps.len());
    }
    Ok(())
}
