use serde::Serialize;

use super::map::GameMap;

/// Number of map slots in a best-of-5 series.
pub const MAPS_PER_SERIES: usize = 5;

/// A best-of-5 series between two teams.
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub maps: Vec<GameMap>,
}

impl Series {
    pub fn new(maps: Vec<GameMap>) -> Self {
        debug_assert_eq!(maps.len(), MAPS_PER_SERIES);
        Self { maps }
    }

    /// The series winner: the team with the most map wins among played maps.
    ///
    /// When two teams tie on map-win count the first team to reach that
    /// count (in map order) is returned; no deeper tie-break is defined.
    /// A series with no decided maps has no winner.
    pub fn winner(&self) -> Option<&str> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for winner in self.maps.iter().filter_map(|m| m.winner()) {
            match counts.iter().position(|(name, _)| *name == winner) {
                Some(at) => counts[at].1 += 1,
                None => counts.push((winner, 1)),
            }
        }
        counts
            .into_iter()
            .fold(None, |best: Option<(&str, usize)>, (name, n)| match best {
                Some((_, m)) if m >= n => best,
                _ => Some((name, n)),
            })
            .map(|(name, _)| name)
    }
}

/// All series published on one major/week scoreboard page.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreboardPage {
    pub major: u8,
    pub week: u8,
    pub series: Vec<Series>,
}
