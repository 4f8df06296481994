use std::path::PathBuf;

use anyhow::{Context, Result};

use tracking_heatmaps::cli::arg_value;
use tracking_heatmaps::logging::init_logging;
use tracking_heatmaps::synth::{self, SynthSpec};

fn main() -> Result<()> {
    init_logging("info");

    let out_dir = arg_value("--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/synthetic"));
    let mut spec = SynthSpec::default();
    if let Some(raw) = arg_value("--frames") {
        spec.frames_per_half = raw.parse().context("--frames must be a frame count")?;
    }
    if let Some(raw) = arg_value("--seed") {
        spec.seed = raw.parse().context("--seed must be an integer")?;
    }

    let generated = synth::generate(&spec);
    let (metadata_path, capture_path) = synth::write_match(&out_dir, &generated)?;

    println!("Synthetic match written");
    println!("Metadata: {}", metadata_path.display());
    println!("Capture: {} ({} frames)", capture_path.display(), generated.frames.len());
    println!(
        "Halves: {}..{} and {}..{}",
        generated.metadata.first_half.start,
        generated.metadata.first_half.end,
        generated.metadata.second_half.start,
        generated.metadata.second_half.end
    );
    Ok(())
}
