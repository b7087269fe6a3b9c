use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: u32,
    pub name: String,
    pub age: Option<u32>,
    pub position: Option<String>,
    pub club: Option<String>,
    pub market_value: Option<String>,
    pub photo: Option<String>,
    pub description: String,
}

impl PlayerInfo {
    pub fn to_ref(&self) -> PlayerRef {
        PlayerRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonStat {
    pub season: String,
    pub goals: u32,
    pub assists: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatTotals {
    pub seasons: usize,
    pub goals: u32,
    pub assists: u32,
}

impl StatTotals {
    pub fn from_seasons(stats: &[SeasonStat]) -> Self {
        stats.iter().fold(
            StatTotals {
                seasons: stats.len(),
                ..StatTotals::default()
            },
            |mut acc, row| {
                acc.goals = acc.goals.saturating_add(row.goals);
                acc.assists = acc.assists.saturating_add(row.assists);
                acc
            },
        )
    }
}

/// Errors a player provider can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No player with the given id.
    NotFound(u32),
    /// Provider unreachable or returned something unparseable.
    Failure(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotFound(id) => write!(f, "Player not found: {}", id),
            LookupError::Failure(msg) => write!(f, "Lookup failed: {}", msg),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<anyhow::Error> for LookupError {
    fn from(err: anyhow::Error) -> Self {
        LookupError::Failure(format!("{err:#}"))
    }
}

pub type LookupResult<T> = Result<T, LookupError>;

/// Source of player data consumed by the shell.
pub trait PlayerProvider {
    fn label(&self) -> &'static str;
    fn search(&self, query: &str) -> LookupResult<Vec<PlayerRef>>;
    fn player_info(&self, id: u32) -> LookupResult<PlayerInfo>;
    fn recommendations(&self, id: u32) -> LookupResult<Vec<PlayerRef>>;
    fn stats(&self, id: u32) -> LookupResult<Vec<SeasonStat>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_sum_goals_and_assists() {
        let stats = vec![
            SeasonStat {
                season: "2010/11".to_string(),
                goals: 4,
                assists: 2,
            },
            SeasonStat {
                season: "2011/12".to_string(),
                goals: 11,
                assists: 7,
            },
        ];
        let totals = StatTotals::from_seasons(&stats);
        assert_eq!(
            totals,
            StatTotals {
                seasons: 2,
                goals: 15,
                assists: 9
            }
        );
    }

    #[test]
    fn anyhow_errors_become_failures() {
        let err: LookupError = anyhow::anyhow!("http 500").context("request failed").into();
        assert_eq!(
            err,
            LookupError::Failure("request failed: http 500".to_string())
        );
    }
}
