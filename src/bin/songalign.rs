use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use songalign::{process_and_align, AlignConfig};

/// Tag EEG onset events with the song playing at that moment.
#[derive(Parser)]
#[command(name = "songalign", version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Write the log to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Align event files against a music-position file.
    Align {
        /// evt.csv files (one output `*-aligned.csv` each)
        #[arg(long, num_args = 1.., required = true)]
        events: Vec<PathBuf>,

        /// Music-position tracking file (CSV with Frame and TriggerNum)
        #[arg(long)]
        music_pos: PathBuf,

        #[command(flatten)]
        opts: ConfigArgs,
    },
    /// Print the song (or "idle") for playback offsets in seconds.
    Classify {
        #[arg(required = true, allow_negative_numbers = true)]
        offsets: Vec<f64>,

        #[command(flatten)]
        opts: ConfigArgs,
    },
}

#[derive(Args)]
struct ConfigArgs {
    /// JSON config (song table, columns, ...); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Trigger number selecting the rows to align
    #[arg(long)]
    trigger: Option<i64>,

    /// Playback sample rate in Hz
    #[arg(long)]
    sample_rate: Option<f64>,

    /// Song duration in seconds
    #[arg(long)]
    song_duration: Option<f64>,
}

impl ConfigArgs {
    fn resolve(&self) -> Result<AlignConfig> {
        let mut cfg = match &self.config {
            Some(path) => AlignConfig::from_json_file(path)?,
            None => AlignConfig::default(),
        };
        if let Some(t) = self.trigger {
            cfg.trigger_num = t;
        }
        if let Some(sr) = self.sample_rate {
            cfg.sample_rate = sr;
        }
        if let Some(d) = self.song_duration {
            cfg.song_duration = d;
        }
        Ok(cfg)
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    match cli.command {
        Commands::Align { events, music_pos, opts } => {
            let cfg = opts.resolve()?;
            let mut failed = 0usize;
            for evt in &events {
                match process_and_align(evt, &music_pos, &cfg) {
                    Ok(out) => println!("{} → {}", evt.display(), out.display()),
                    Err(e) => {
                        tracing::error!(file = %evt.display(), "{e:#}");
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                anyhow::bail!("{failed} of {} event files failed", events.len());
            }
        }
        Commands::Classify { offsets, opts } => {
            let schedule = opts.resolve()?.schedule()?;
            for offset in offsets {
                println!("{offset}\t{}", schedule.classify(offset));
            }
        }
    }
    Ok(())
}
