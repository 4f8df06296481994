use std::path::PathBuf;

use anyhow::{Result, anyhow};

use tracking_heatmaps::cli::arg_value;
use tracking_heatmaps::config::PipelineConfig;
use tracking_heatmaps::logging::init_logging;
use tracking_heatmaps::pipeline::{self, PreprocessSummary};
use tracking_heatmaps::render::RenderReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    All,
    Preprocess,
    Render,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging("info");

    let stage = parse_stage_arg()?;
    let cfg = PipelineConfig::resolve(arg_value("--config").map(PathBuf::from))?;

    match stage {
        Stage::All => {
            let (summary, report) = pipeline::run_all(&cfg)?;
            print_preprocess(&summary);
            print_render(&report);
        }
        Stage::Preprocess => {
            let summary = pipeline::preprocess(&cfg)?;
            print_preprocess(&summary);
        }
        Stage::Render => {
            let metadata = pipeline::load_match_metadata(&cfg)?;
            let report = pipeline::render(&cfg, &metadata)?;
            print_render(&report);
        }
    }
    Ok(())
}

fn print_preprocess(summary: &PreprocessSummary) {
    println!("Preprocess complete");
    println!(
        "Pitch: {:.1} x {:.1} m",
        summary.metadata.pitch.width, summary.metadata.pitch.height
    );
    println!(
        "In-play frames: {}/{}",
        summary.in_play.lines_kept, summary.in_play.lines_read
    );
    println!("Sampled frames: {}", summary.sampled.lines_kept);
    println!(
        "Players kept: {} (dropped {})",
        summary.categorized.players_kept, summary.categorized.players_dropped
    );
    println!(
        "Ball kept: {} (dropped {})",
        summary.categorized.balls_kept, summary.categorized.balls_dropped
    );
}

fn print_render(report: &RenderReport) {
    println!("Rendered windows: {}", report.rendered.len());
    for item in &report.rendered {
        println!(
            " - minutes {}: {}m -> {}",
            item.window.label(),
            item.distance,
            item.image.display()
        );
    }
    if !report.skipped.is_empty() {
        println!("Skipped by distance filter: {}", report.skipped.len());
    }
    if let Some(window) = report.halted_at {
        println!("Stopped at minutes {} (no more data)", window.label());
    }
}

fn parse_stage_arg() -> Result<Stage> {
    let Some(raw) = arg_value("--stage") else {
        return Ok(Stage::All);
    };
    match raw.to_ascii_lowercase().as_str() {
        "all" => Ok(Stage::All),
        "preprocess" => Ok(Stage::Preprocess),
        "render" => Ok(Stage::Render),
        other => Err(anyhow!("unknown stage {other:?} (expected all, preprocess or render)")),
    }
}
