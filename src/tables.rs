use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

pub const PLAYERS_FILE: &str = "players.csv";
pub const BALL_FILE: &str = "ball.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub frame_num: u64,
    pub team_id: i32,
    pub player_id: i64,
    pub squad_num: i32,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallRecord {
    pub frame_num: u64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub speed: f64,
    pub possession: String,
    pub in_play: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    pub players: Vec<PlayerRecord>,
    pub ball: Vec<BallRecord>,
}

impl Tables {
    pub fn players_path(dir: &Path) -> PathBuf {
        dir.join(PLAYERS_FILE)
    }

    pub fn ball_path(dir: &Path) -> PathBuf {
        dir.join(BALL_FILE)
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).with_context(|| format!("create tables dir {}", dir.display()))?;
        write_csv(&Self::players_path(dir), &self.players)?;
        write_csv(&Self::ball_path(dir), &self.ball)?;
        Ok(())
    }

    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            players: read_csv(&Self::players_path(dir))?,
            ball: read_csv(&Self::ball_path(dir))?,
        })
    }
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("open {}", path.display()))?;
    let mut rows = Vec::new();
    for (idx, row) in reader.deserialize().enumerate() {
        let row: T = row.with_context(|| format!("{} row {}", path.display(), idx + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_survive_disk_and_keep_headers() {
        let dir = tempfile::tempdir().unwrap();
        let tables = Tables {
            players: vec![PlayerRecord {
                frame_num: 10,
                team_id: 1,
                player_id: 44,
                squad_num: 9,
                x: 52.5,
                y: 34.0,
                speed: 3.2,
            }],
            ball: vec![BallRecord {
                frame_num: 10,
                x: 50.0,
                y: 30.0,
                z: 0.11,
                speed: 12.0,
                possession: "H".to_string(),
                in_play: "Alive".to_string(),
            }],
        };
        tables.save(dir.path()).unwrap();

        let header = fs::read_to_string(Tables::players_path(dir.path())).unwrap();
        assert!(header.starts_with("frame_num,team_id,player_id,squad_num,x,y,speed"));

        let loaded = Tables::load(dir.path()).unwrap();
        assert_eq!(loaded, tables);
    }
}
