use std::path::PathBuf;

use anyhow::Result;

use tracking_heatmaps::cli::arg_value;
use tracking_heatmaps::config::PipelineConfig;
use tracking_heatmaps::export::export_tables;
use tracking_heatmaps::logging::init_logging;
use tracking_heatmaps::tables::Tables;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env");
    init_logging("info");

    let cfg = PipelineConfig::resolve(arg_value("--config").map(PathBuf::from))?;
    let tables = Tables::load(&cfg.tables_dir)?;
    let path = cfg.workbook_path();
    let report = export_tables(&path, &tables)?;

    println!("Workbook: {}", path.display());
    println!("Players rows: {}", report.players);
    println!("Ball rows: {}", report.ball);
    Ok(())
}
