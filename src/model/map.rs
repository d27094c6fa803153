use serde::Serialize;

use super::GameMode;

/// Number of player rows every stats table is normalized to (4 per team).
pub const PLAYERS_PER_MAP: usize = 8;

/// Header information for a single played map within a series.
#[derive(Debug, Clone, Serialize)]
pub struct MapInfo {
    pub team1: String,
    pub team2: String,
    pub team1_score: u32,
    pub team2_score: u32,
    pub map_name: String,
    /// Map duration as shown on the scoreboard, `MM:SS`.
    pub duration: String,
    pub mode: GameMode,
}

impl MapInfo {
    /// The team with the strictly greater score. A score tie leaves the map
    /// undecided.
    pub fn winner(&self) -> Option<&str> {
        match self.team1_score.cmp(&self.team2_score) {
            std::cmp::Ordering::Greater => Some(&self.team1),
            std::cmp::Ordering::Less => Some(&self.team2),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn loser(&self) -> Option<&str> {
        match self.team1_score.cmp(&self.team2_score) {
            std::cmp::Ordering::Greater => Some(&self.team2),
            std::cmp::Ordering::Less => Some(&self.team1),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// One player row on a Hardpoint scoreboard.
#[derive(Debug, Clone, Serialize)]
pub struct HardpointRow {
    pub player: String,
    pub kills: u32,
    pub deaths: u32,
    pub kd: f64,
    pub hill_time: u32,
}

/// One player row on a Search and Destroy scoreboard.
#[derive(Debug, Clone, Serialize)]
pub struct SearchAndDestroyRow {
    pub player: String,
    pub kills: u32,
    pub deaths: u32,
    pub kd: f64,
    pub first_kill: u32,
    pub first_death: u32,
    pub plant: u32,
    pub defuse: u32,
}

/// One player row on a Control scoreboard.
#[derive(Debug, Clone, Serialize)]
pub struct ControlRow {
    pub player: String,
    pub kills: u32,
    pub deaths: u32,
    pub kd: f64,
    pub captures: u32,
}

/// A full stats table for one map, tagged by gamemode.
///
/// Invariant: every variant holds exactly [`PLAYERS_PER_MAP`] rows, the first
/// four belonging to team 1 and the last four to team 2. Rows the scoreboard
/// did not supply are zero-filled.
#[derive(Debug, Clone, Serialize)]
pub enum PlayerStats {
    Hardpoint(Vec<HardpointRow>),
    SearchAndDestroy(Vec<SearchAndDestroyRow>),
    Control(Vec<ControlRow>),
}

/// Mode-specific counters of a single player row, used by the reshaped
/// short format.
#[derive(Debug, Clone, Serialize)]
pub enum ModeExtras {
    Hardpoint {
        hill_time: u32,
    },
    SearchAndDestroy {
        first_kill: u32,
        first_death: u32,
        plant: u32,
        defuse: u32,
    },
    Control {
        captures: u32,
    },
}

/// A mode-agnostic view of one player row.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerLine {
    pub player: String,
    pub kills: u32,
    pub deaths: u32,
    pub kd: f64,
    pub extras: ModeExtras,
}

impl PlayerStats {
    pub fn mode(&self) -> GameMode {
        match self {
            PlayerStats::Hardpoint(_) => GameMode::Hardpoint,
            PlayerStats::SearchAndDestroy(_) => GameMode::SearchAndDestroy,
            PlayerStats::Control(_) => GameMode::Control,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PlayerStats::Hardpoint(rows) => rows.len(),
            PlayerStats::SearchAndDestroy(rows) => rows.len(),
            PlayerStats::Control(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column names of this table, in scoreboard order.
    pub fn columns(&self) -> &'static [&'static str] {
        self.mode().columns()
    }

    /// The cells of row `index` rendered as strings, in [`Self::columns`]
    /// order. Used by the long-format reshaper and CSV export.
    pub fn row_cells(&self, index: usize) -> Vec<String> {
        match self {
            PlayerStats::Hardpoint(rows) => {
                let r = &rows[index];
                vec![
                    r.player.clone(),
                    r.kills.to_string(),
                    r.deaths.to_string(),
                    r.kd.to_string(),
                    r.hill_time.to_string(),
                ]
            }
            PlayerStats::SearchAndDestroy(rows) => {
                let r = &rows[index];
                vec![
                    r.player.clone(),
                    r.kills.to_string(),
                    r.deaths.to_string(),
                    r.kd.to_string(),
                    r.first_kill.to_string(),
                    r.first_death.to_string(),
                    r.plant.to_string(),
                    r.defuse.to_string(),
                ]
            }
            PlayerStats::Control(rows) => {
                let r = &rows[index];
                vec![
                    r.player.clone(),
                    r.kills.to_string(),
                    r.deaths.to_string(),
                    r.kd.to_string(),
                    r.captures.to_string(),
                ]
            }
        }
    }

    /// A typed view of row `index`.
    pub fn line(&self, index: usize) -> PlayerLine {
        match self {
            PlayerStats::Hardpoint(rows) => {
                let r = &rows[index];
                PlayerLine {
                    player: r.player.clone(),
                    kills: r.kills,
                    deaths: r.deaths,
                    kd: r.kd,
                    extras: ModeExtras::Hardpoint {
                        hill_time: r.hill_time,
                    },
                }
            }
            PlayerStats::SearchAndDestroy(rows) => {
                let r = &rows[index];
                PlayerLine {
                    player: r.player.clone(),
                    kills: r.kills,
                    deaths: r.deaths,
                    kd: r.kd,
                    extras: ModeExtras::SearchAndDestroy {
                        first_kill: r.first_kill,
                        first_death: r.first_death,
                        plant: r.plant,
                        defuse: r.defuse,
                    },
                }
            }
            PlayerStats::Control(rows) => {
                let r = &rows[index];
                PlayerLine {
                    player: r.player.clone(),
                    kills: r.kills,
                    deaths: r.deaths,
                    kd: r.kd,
                    extras: ModeExtras::Control {
                        captures: r.captures,
                    },
                }
            }
        }
    }
}

/// One map slot of a best-of-5 series.
///
/// A map that was not played (`DNP` on the scoreboard), or whose segment
/// could not be parsed, carries no data at all: header and stats are either
/// both present or both absent.
#[derive(Debug, Clone, Serialize)]
pub struct GameMap {
    played: Option<PlayedMap>,
}

/// The header and stats of a map that actually ran.
#[derive(Debug, Clone, Serialize)]
pub struct PlayedMap {
    pub info: MapInfo,
    pub stats: PlayerStats,
}

impl GameMap {
    pub fn unplayed() -> Self {
        Self { played: None }
    }

    pub fn played(info: MapInfo, stats: PlayerStats) -> Self {
        debug_assert_eq!(stats.len(), PLAYERS_PER_MAP);
        Self {
            played: Some(PlayedMap { info, stats }),
        }
    }

    pub fn as_played(&self) -> Option<&PlayedMap> {
        self.played.as_ref()
    }

    pub fn info(&self) -> Option<&MapInfo> {
        self.played.as_ref().map(|p| &p.info)
    }

    pub fn stats(&self) -> Option<&PlayerStats> {
        self.played.as_ref().map(|p| &p.stats)
    }

    /// The winning team name, when the map was played and decided.
    pub fn winner(&self) -> Option<&str> {
        self.info().and_then(|i| i.winner())
    }
}
