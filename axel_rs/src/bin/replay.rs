use std::path::PathBuf;

use anyhow::{Context, Result};
use axel_rs::chart::Chart;
use axel_rs::config::AppConfig;
use axel_rs::storage::{read_recording, RecordingStats};
use clap::Parser;
use serde_json::json;

/// Replay a recorded gyroscope CSV through the live chart
#[derive(Parser, Debug)]
struct Args {
    /// Path to a recording (time;x;y;z)
    #[arg(long)]
    csv: PathBuf,

    /// Optional JSON config overriding chart defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// View width in px
    #[arg(long, default_value = "1080")]
    width: f32,

    /// View height in px
    #[arg(long, default_value = "720")]
    height: f32,

    /// Print the final frame as JSON instead of a summary
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };

    let rows = read_recording(&args.csv)
        .with_context(|| format!("reading {}", args.csv.display()))?;
    log::info!("Loaded {} rows from {}", rows.len(), args.csv.display());

    let mut chart = Chart::new(config.chart.clone());
    for row in &rows {
        chart.add_sample(&row.to_sample());
    }
    let frame = chart.frame(args.width, args.height);
    let stats = RecordingStats::from_rows(&rows);

    if args.json {
        let out = json!({
            "stats": stats,
            "frame": frame,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Recording: {}", args.csv.display());
    println!("  Rows:      {}", stats.row_count);
    println!("  Duration:  {:.3} s", stats.duration_secs);
    println!("  Peak rate: {:.6} rad/s", stats.peak_rate);
    println!(
        "  Mean:      x={:.6} y={:.6} z={:.6}",
        stats.mean_rate[0], stats.mean_rate[1], stats.mean_rate[2]
    );
    println!(
        "  Chart:     {} points visible, {} line segments",
        chart.buffer().len(),
        frame.lines.len()
    );

    Ok(())
}
