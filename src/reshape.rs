use serde::Serialize;

use crate::model::{ModeExtras, PlayerLine, ScoreboardPage, PLAYERS_PER_MAP};

/// Deterministic series identifier: the first letter of every word of each
/// team name, in input order, then week and major.
///
/// `("New York Subliners", "Los Angeles Thieves", 2, 1)` gives
/// `"NYSLATW2M1"`. Two matchups sharing initials in the same week/major
/// collide; that risk is accepted.
pub fn create_match_id(team1: &str, team2: &str, week: u8, major: u8) -> String {
    let initials = |name: &str| -> String {
        name.split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect()
    };
    format!("{}{}W{week}M{major}", initials(team1), initials(team2))
}

/// A wide table with one row per played map and every player slot's stats
/// spread across suffixed columns.
#[derive(Debug, Clone, Serialize)]
pub struct LongTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

const MAP_META_COLUMNS: [&str; 7] = [
    "team1",
    "team2",
    "team1_score",
    "team2_score",
    "map",
    "time",
    "mode",
];

/// Reshape a scoreboard page into long format: one row per played map,
/// map metadata first, then each stat column suffixed `_1` through `_8`.
///
/// Weeks mixing gamemodes take the union of the per-mode columns in order
/// of first appearance; cells a mode does not define stay empty.
pub fn long_format(page: &ScoreboardPage) -> LongTable {
    let mut columns: Vec<String> = MAP_META_COLUMNS.iter().map(|c| c.to_string()).collect();
    let mut rows = Vec::new();

    for played in page
        .series
        .iter()
        .flat_map(|s| s.maps.iter())
        .filter_map(|m| m.as_played())
    {
        for slot in 0..PLAYERS_PER_MAP {
            for col in played.stats.columns() {
                let name = format!("{col}_{}", slot + 1);
                if !columns.contains(&name) {
                    columns.push(name);
                }
            }
        }

        let mut row = vec![String::new(); columns.len()];
        let info = &played.info;
        let meta = [
            info.team1.clone(),
            info.team2.clone(),
            info.team1_score.to_string(),
            info.team2_score.to_string(),
            info.map_name.clone(),
            info.duration.clone(),
            info.mode.to_string(),
        ];
        row[..MAP_META_COLUMNS.len()].clone_from_slice(&meta);

        for slot in 0..PLAYERS_PER_MAP {
            let cells = played.stats.row_cells(slot);
            for (col, value) in played.stats.columns().iter().zip(cells) {
                let name = format!("{col}_{}", slot + 1);
                let at = columns.iter().position(|c| c == &name).unwrap_or_default();
                row[at] = value;
            }
        }
        rows.push(row);
    }

    // Earlier rows may predate columns introduced by a later mode.
    for row in &mut rows {
        row.resize(columns.len(), String::new());
    }

    LongTable { columns, rows }
}

/// Which way a map went for the row's team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum MapOutcome {
    Winner,
    Loser,
}

/// One player's row in the short format: their map stats plus team, outcome
/// and series annotations.
#[derive(Debug, Clone, Serialize)]
pub struct ShortRecord {
    pub player: String,
    pub kills: u32,
    pub deaths: u32,
    pub kd: f64,
    pub extras: ModeExtras,
    pub team_name: String,
    pub team_score: u32,
    pub map_outcome: MapOutcome,
    pub match_id: String,
    /// The map's name. The column has always been called `map_winner`
    /// despite holding the map identity, and downstream consumers rely on
    /// the name.
    pub map_winner: String,
    pub mode: String,
    pub gametime: String,
    /// Series winner, absent when no map of the series was decided.
    pub match_winner: Option<String>,
}

/// Reshape a scoreboard page into short format: one row per player per
/// played map.
///
/// The per-map outcome compares team scores directly; on a score tie team 2
/// is labeled the winner, a quirk kept for parity with existing datasets.
pub fn short_format(page: &ScoreboardPage) -> Vec<ShortRecord> {
    let mut records = Vec::new();
    for series in &page.series {
        let match_winner = series.winner().map(|w| w.to_string());
        for played in series.maps.iter().filter_map(|m| m.as_played()) {
            let info = &played.info;
            let match_id = create_match_id(&info.team1, &info.team2, page.week, page.major);
            for slot in 0..PLAYERS_PER_MAP {
                let team1_side = slot < PLAYERS_PER_MAP / 2;
                let (team_name, team_score) = if team1_side {
                    (info.team1.clone(), info.team1_score)
                } else {
                    (info.team2.clone(), info.team2_score)
                };
                let team1_won = info.team1_score > info.team2_score;
                let map_outcome = if team1_side == team1_won {
                    MapOutcome::Winner
                } else {
                    MapOutcome::Loser
                };

                let PlayerLine {
                    player,
                    kills,
                    deaths,
                    kd,
                    extras,
                } = played.stats.line(slot);
                records.push(ShortRecord {
                    player,
                    kills,
                    deaths,
                    kd,
                    extras,
                    team_name,
                    team_score,
                    map_outcome,
                    match_id: match_id.clone(),
                    map_winner: info.map_name.clone(),
                    mode: info.mode.compact_name(),
                    gametime: info.duration.clone(),
                    match_winner: match_winner.clone(),
                });
            }
        }
    }
    records
}
