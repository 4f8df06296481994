use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

pub const CONFIG_ENV: &str = "TRACKING_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Render when `threshold > distance`.
    #[serde(rename = ">")]
    Greater,
    /// Render when `threshold < distance`.
    #[serde(rename = "<")]
    Less,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceFilter {
    pub threshold: f64,
    pub direction: Direction,
}

impl Default for DistanceFilter {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            direction: Direction::Greater,
        }
    }
}

impl DistanceFilter {
    pub fn is_active(&self) -> bool {
        self.threshold != 0.0
    }

    pub fn passes(&self, distance: f64) -> bool {
        match self.direction {
            Direction::Greater => self.threshold > distance,
            Direction::Less => self.threshold < distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    pub minutes: u32,
    pub entity1: Entity,
    pub team1: i32,
    pub entity2: Entity,
    pub team2: i32,
    #[serde(default)]
    pub distance_filter: DistanceFilter,
    /// Windows must end before this many minutes of sampled play.
    #[serde(default = "default_max_minutes")]
    pub max_minutes: u32,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            minutes: 5,
            entity1: Entity::group([9, 18]),
            team1: 1,
            entity2: Entity::group([14, 4]),
            team2: 0,
            distance_filter: DistanceFilter::default(),
            max_minutes: default_max_minutes(),
        }
    }
}

fn default_max_minutes() -> u32 {
    100
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub metadata_path: PathBuf,
    pub capture_path: PathBuf,
    pub work_dir: PathBuf,
    pub tables_dir: PathBuf,
    pub figures_dir: PathBuf,
    pub sample_seconds: u32,
    pub export_workbook: bool,
    pub comparison: ComparisonConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            metadata_path: PathBuf::from("data/metadata/metadata.xml"),
            capture_path: PathBuf::from("data/gamedata/987601.dat"),
            work_dir: PathBuf::from("data/gamedata"),
            tables_dir: PathBuf::from("data/tables"),
            figures_dir: PathBuf::from("figures"),
            sample_seconds: 1,
            export_workbook: false,
            comparison: ComparisonConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        let path = explicit.or_else(|| {
            std::env::var(CONFIG_ENV)
                .ok()
                .filter(|val| !val.trim().is_empty())
                .map(PathBuf::from)
        });
        let mut cfg = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(minutes) = env_parse::<u32>("TRACKING_MINUTES") {
            self.comparison.minutes = minutes;
        }
        if let Some(seconds) = env_parse::<u32>("TRACKING_SAMPLE_SECONDS") {
            self.sample_seconds = seconds;
        }
        if let Some(max) = env_parse::<u32>("TRACKING_MAX_MINUTES") {
            self.comparison.max_minutes = max;
        }
        if let Ok(dir) = std::env::var("TRACKING_FIGURES_DIR")
            && !dir.trim().is_empty()
        {
            self.figures_dir = PathBuf::from(dir.trim());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_seconds == 0 {
            bail!("sample_seconds must be at least 1");
        }
        self.comparison.validate()
    }

    pub fn in_play_path(&self) -> PathBuf {
        self.work_dir.join("in_play.dat")
    }

    pub fn sampled_path(&self) -> PathBuf {
        self.work_dir.join("short_data.dat")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.work_dir.join("render_summary.json")
    }

    pub fn workbook_path(&self) -> PathBuf {
        self.tables_dir.join("tables.xlsx")
    }
}

impl ComparisonConfig {
    pub fn validate(&self) -> Result<()> {
        if self.minutes == 0 {
            bail!("comparison minutes must be at least 1");
        }
        if self.max_minutes == 0 {
            bail!("max_minutes must be at least 1");
        }
        if self.entity1.is_empty() || self.entity2.is_empty() {
            bail!("player groups must name at least one shirt number");
        }
        if !self.distance_filter.threshold.is_finite() {
            bail!("distance threshold must be a finite number");
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<T>().ok())
}
