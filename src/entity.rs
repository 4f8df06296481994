use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tables::PlayerRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Single(i32),
    Group(BTreeSet<i32>),
}

impl Entity {
    pub fn group(ids: impl IntoIterator<Item = i32>) -> Self {
        Entity::Group(ids.into_iter().collect())
    }

    pub fn rows_per_second(&self) -> usize {
        match self {
            Entity::Single(_) => 1,
            Entity::Group(ids) => ids.len(),
        }
    }

    pub fn contains(&self, squad_num: i32) -> bool {
        match self {
            Entity::Single(id) => *id == squad_num,
            Entity::Group(ids) => ids.contains(&squad_num),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Entity::Group(ids) if ids.is_empty())
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Single(id) => write!(f, "{id}"),
            Entity::Group(ids) => {
                let parts = ids.iter().map(|id| id.to_string()).collect::<Vec<_>>();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub entity: &'a Entity,
    pub rows: Vec<&'a PlayerRecord>,
}

impl<'a> Selection<'a> {
    pub fn new(players: &'a [PlayerRecord], entity: &'a Entity, team_id: i32) -> Self {
        let rows = players
            .iter()
            .filter(|row| row.team_id == team_id && entity.contains(row.squad_num))
            .collect();
        Self { entity, rows }
    }

    /// Rows for the seconds `[start_s, end_s)`, scaled by the group size.
    pub fn window(&self, start_s: usize, end_s: usize) -> &[&'a PlayerRecord] {
        let per_second = self.entity.rows_per_second();
        let len = self.rows.len();
        let lo = (start_s * per_second).min(len);
        let hi = (end_s * per_second).min(len);
        &self.rows[lo..hi]
    }
}
