use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::tables::Tables;

pub struct ExportReport {
    pub players: usize,
    pub ball: usize,
}

pub fn export_tables(path: &Path, tables: &Tables) -> Result<ExportReport> {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Players")?;
        write_header(
            sheet,
            &["frame_num", "team_id", "player_id", "squad_num", "x", "y", "speed"],
        )?;
        for (idx, row) in tables.players.iter().enumerate() {
            let r = idx as u32 + 1;
            write_numbers(
                sheet,
                r,
                &[
                    row.frame_num as f64,
                    f64::from(row.team_id),
                    row.player_id as f64,
                    f64::from(row.squad_num),
                    row.x,
                    row.y,
                    row.speed,
                ],
            )?;
        }
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Ball")?;
        write_header(
            sheet,
            &["frame_num", "x", "y", "z", "speed", "possession", "in_play"],
        )?;
        for (idx, row) in tables.ball.iter().enumerate() {
            let r = idx as u32 + 1;
            write_numbers(sheet, r, &[row.frame_num as f64, row.x, row.y, row.z, row.speed])?;
            sheet
                .write_string(r, 5, &row.possession)
                .with_context(|| format!("write cell ({r},5)"))?;
            sheet
                .write_string(r, 6, &row.in_play)
                .with_context(|| format!("write cell ({r},6)"))?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        players: tables.players.len(),
        ball: tables.ball.len(),
    })
}

fn write_header(worksheet: &mut Worksheet, names: &[&str]) -> Result<()> {
    for (col_idx, name) in names.iter().enumerate() {
        worksheet
            .write_string(0, col_idx as u16, *name)
            .with_context(|| format!("write header ({col_idx})"))?;
    }
    Ok(())
}

fn write_numbers(worksheet: &mut Worksheet, row: u32, values: &[f64]) -> Result<()> {
    for (col_idx, value) in values.iter().enumerate() {
        worksheet
            .write_number(row, col_idx as u16, *value)
            .with_context(|| format!("write cell ({row},{col_idx})"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::PlayerRecord;

    #[test]
    fn writes_workbook_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.xlsx");
        let tables = Tables {
            players: vec![PlayerRecord {
                frame_num: 1,
                team_id: 1,
                player_id: 5,
                squad_num: 9,
                x: 10.0,
                y: 20.0,
                speed: 1.5,
            }],
            ball: Vec::new(),
        };
        let report = export_tables(&path, &tables).unwrap();
        assert_eq!(report.players, 1);
        assert_eq!(report.ball, 0);
        assert!(path.metadata().unwrap().len() > 0);
    }
}
