use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use eduace::config::{FromEnv, ProctorConfig};
use eduace::proctor::{parse_timeline, replay, AlertKind};
use serde::Serialize;

#[derive(Parser)]
#[command(author, version, about = "Replay a face-count timeline through the proctoring monitor", long_about = None)]
#[command(after_help = "SCRIPT FORMAT:
    [{\"at_secs\": 0.0, \"face_count\": 0}, {\"at_secs\": 6.1, \"face_count\": 1}]

ENVIRONMENT VARIABLES:
    EDUACE_NOT_FACING_SECS  Not-facing threshold in seconds (default 5)
    RUST_LOG                Log filter, e.g. eduace=debug")]
struct Args {
    /// JSON file holding the observation timeline
    #[arg(short, long)]
    script: PathBuf,

    /// Override the not-facing threshold
    #[arg(long)]
    threshold_secs: Option<f64>,

    /// Print one JSON object per observation
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ReplayLine<'a> {
    at_secs: f64,
    face_count: i64,
    #[serde(flatten)]
    snapshot: &'a eduace::AlertSnapshot,
}

fn main() -> anyhow::Result<()> {
    // Load .env first so RUST_LOG in .env is seen
    let _ = dotenvy::dotenv();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args = Args::parse();

    let mut config = ProctorConfig::from_env()?;
    if let Some(secs) = args.threshold_secs {
        let threshold = Duration::try_from_secs_f64(secs)
            .with_context(|| format!("invalid threshold: {secs}"))?;
        config = config.with_threshold(threshold);
    }

    let raw = std::fs::read_to_string(&args.script)
        .with_context(|| format!("reading {}", args.script.display()))?;
    let entries = parse_timeline(&raw).context("parsing script")?;
    let snapshots = replay(&entries, &config).context("replay rejected")?;

    for (entry, snapshot) in entries.iter().zip(&snapshots) {
        if args.json {
            let line = ReplayLine {
                at_secs: entry.at_secs,
                face_count: entry.face_count,
                snapshot,
            };
            println!("{}", serde_json::to_string(&line)?);
        } else {
            let mut notes = Vec::new();
            if snapshot.raised(AlertKind::NotFacing) {
                notes.push("Warning: Face not detected for too long!");
            }
            if snapshot.raised(AlertKind::MultipleFaces) {
                notes.push("Warning: Multiple faces detected! Ensure only one person is in view.");
            }
            println!(
                "t={:>7.2}s faces={} not_facing={} multiple_faces={} {}",
                entry.at_secs,
                entry.face_count,
                snapshot.not_facing_alert_active,
                snapshot.multiple_faces_alert_active,
                notes.join(" ")
            );
        }
    }

    Ok(())
}
