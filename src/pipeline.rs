use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::PipelineConfig;
use crate::downsample::downsample;
use crate::export::export_tables;
use crate::filter::{StreamStats, filter_in_play};
use crate::metadata::{MatchMetadata, load_metadata};
use crate::normalize::{CategorizeStats, PitchTransform, categorize};
use crate::render::{RenderReport, render_comparison};
use crate::tables::Tables;

#[derive(Debug, Clone)]
pub struct PreprocessSummary {
    pub metadata: MatchMetadata,
    pub in_play: StreamStats,
    pub sampled: StreamStats,
    pub categorized: CategorizeStats,
}

pub fn load_match_metadata(cfg: &PipelineConfig) -> Result<MatchMetadata> {
    load_metadata(&cfg.metadata_path)
        .with_context(|| format!("load metadata {}", cfg.metadata_path.display()))
}

fn open_reader(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn create_writer(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

pub fn preprocess(cfg: &PipelineConfig) -> Result<PreprocessSummary> {
    let metadata = load_match_metadata(cfg)?;
    info!(
        pitch_w = metadata.pitch.width,
        pitch_h = metadata.pitch.height,
        first_half = ?(metadata.first_half.start, metadata.first_half.end),
        second_half = ?(metadata.second_half.start, metadata.second_half.end),
        "loaded match metadata"
    );

    let in_play_path = cfg.in_play_path();
    let in_play = filter_in_play(
        open_reader(&cfg.capture_path)?,
        create_writer(&in_play_path)?,
        metadata.halves(),
    )
    .with_context(|| format!("filter {}", cfg.capture_path.display()))?;
    info!(read = in_play.lines_read, kept = in_play.lines_kept, "filtered in-play frames");

    let sampled_path = cfg.sampled_path();
    let sampled = downsample(
        open_reader(&in_play_path)?,
        create_writer(&sampled_path)?,
        cfg.sample_seconds,
    )
    .with_context(|| format!("downsample {}", in_play_path.display()))?;
    info!(
        seconds = cfg.sample_seconds,
        kept = sampled.lines_kept,
        "downsampled capture"
    );

    let transform = PitchTransform::new(metadata.pitch, metadata.tracking_area);
    let (tables, categorized) = categorize(open_reader(&sampled_path)?, &transform)
        .with_context(|| format!("categorize {}", sampled_path.display()))?;
    tables.save(&cfg.tables_dir)?;
    info!(
        players = tables.players.len(),
        ball = tables.ball.len(),
        dir = %cfg.tables_dir.display(),
        "wrote tables"
    );

    if cfg.export_workbook {
        let path = cfg.workbook_path();
        export_tables(&path, &tables)?;
        info!(path = %path.display(), "exported workbook");
    }

    Ok(PreprocessSummary {
        metadata,
        in_play,
        sampled,
        categorized,
    })
}

pub fn render(cfg: &PipelineConfig, metadata: &MatchMetadata) -> Result<RenderReport> {
    let tables = Tables::load(&cfg.tables_dir)?;
    let report = render_comparison(
        &tables.players,
        metadata.pitch,
        &cfg.comparison,
        &cfg.figures_dir,
    )?;
    report.save(&cfg.summary_path())?;
    Ok(report)
}

pub fn run_all(cfg: &PipelineConfig) -> Result<(PreprocessSummary, RenderReport)> {
    let summary = preprocess(cfg)?;
    let report = render(cfg, &summary.metadata)?;
    Ok((summary, report))
}
