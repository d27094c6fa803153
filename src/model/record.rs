use serde::Serialize;

/// Divide two counters, treating a zero denominator as `0` rather than
/// letting NaN/Inf leak into downstream joins.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Which side of a CDL match a team played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TeamSide {
    Host,
    Guest,
}

/// Team slot in an aggregated per-match row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SeriesTeam {
    Team1,
    Team2,
}

/// One player's raw counters on one map, flattened from the CDL
/// match-detail API.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRecord {
    pub match_id: u64,
    pub player: String,
    pub side: TeamSide,
    pub abbrev: String,
    pub oppo_abbrev: String,
    pub game_mode: String,
    pub game_map: String,
    pub host_score: u32,
    pub guest_score: u32,
    pub damage: f64,
    pub kills: u32,
    pub deaths: u32,
    pub first_blood_kills: u32,
    pub rotation_kills: u32,
    pub shots_hit: u32,
    pub shots_fired: u32,
    pub untraded_kills: u32,
    pub traded_deaths: u32,
}

impl MatchRecord {
    /// Which side took the map. A score tie goes to the guest, matching the
    /// strict host-score comparison used everywhere downstream.
    pub fn map_winner(&self) -> TeamSide {
        if self.host_score > self.guest_score {
            TeamSide::Host
        } else {
            TeamSide::Guest
        }
    }

    pub fn is_winner(&self) -> bool {
        self.map_winner() == self.side
    }

    pub fn kd(&self) -> f64 {
        ratio(self.kills as f64, self.deaths as f64)
    }

    /// Shots hit over shots fired, as a percentage.
    pub fn accuracy(&self) -> f64 {
        ratio(self.shots_hit as f64, self.shots_fired as f64) * 100.0
    }

    pub fn damage_per_kill(&self) -> f64 {
        ratio(self.damage, self.kills as f64)
    }

    pub fn kills_untraded_perc(&self) -> f64 {
        ratio(self.untraded_kills as f64, self.kills as f64) * 100.0
    }

    pub fn deaths_traded_perc(&self) -> f64 {
        ratio(self.traded_deaths as f64, self.deaths as f64) * 100.0
    }
}

/// Per-team summed counters for one map, the grouping unit of the
/// aggregated reshaper.
#[derive(Debug, Clone, Serialize)]
pub struct TeamAggregate {
    pub match_id: u64,
    pub game_map: String,
    pub game_mode: String,
    pub side: TeamSide,
    pub abbrev: String,
    pub oppo_abbrev: String,
    pub map_winner: TeamSide,
    pub host_score: u32,
    pub guest_score: u32,
    pub damage: f64,
    pub kills: u32,
    pub deaths: u32,
    pub first_blood_kills: u32,
    pub rotation_kills: u32,
    pub shots_hit: u32,
    pub shots_fired: u32,
}

impl TeamAggregate {
    pub fn rounds(&self) -> u32 {
        self.host_score + self.guest_score
    }

    /// Ratios are always computed from the summed counters, never averaged
    /// over per-player ratios.
    pub fn team_kd(&self) -> f64 {
        ratio(self.kills as f64, self.deaths as f64)
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.shots_hit as f64, self.shots_fired as f64)
    }

    pub fn rotational_percent(&self) -> f64 {
        ratio(self.rotation_kills as f64, self.kills as f64)
    }

    pub fn fb_perc(&self) -> f64 {
        ratio(self.first_blood_kills as f64, self.rounds() as f64)
    }

    /// Host team abbreviation regardless of which side this aggregate holds.
    pub fn host_abbrev(&self) -> &str {
        match self.side {
            TeamSide::Host => &self.abbrev,
            TeamSide::Guest => &self.oppo_abbrev,
        }
    }

    pub fn guest_abbrev(&self) -> &str {
        match self.side {
            TeamSide::Host => &self.oppo_abbrev,
            TeamSide::Guest => &self.abbrev,
        }
    }
}

/// One map condensed to a dual-team feature row for the classifier.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummaryRow {
    pub mode: String,
    pub damage_team1: f64,
    pub team_kd_team1: f64,
    pub accuracy_team1: f64,
    pub rotational_percent_team1: f64,
    pub fb_perc_team1: f64,
    pub damage_team2: f64,
    pub team_kd_team2: f64,
    pub accuracy_team2: f64,
    pub rotational_percent_team2: f64,
    pub fb_perc_team2: f64,
    pub winner: SeriesTeam,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominators_yield_zero() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        let record = MatchRecord {
            match_id: 1,
            player: "Aches".to_string(),
            side: TeamSide::Host,
            abbrev: "NYSL".to_string(),
            oppo_abbrev: "LAT".to_string(),
            game_mode: "CDL Hardpoint".to_string(),
            game_map: "Hotel".to_string(),
            host_score: 0,
            guest_score: 0,
            damage: 1000.0,
            kills: 0,
            deaths: 0,
            first_blood_kills: 0,
            rotation_kills: 0,
            shots_hit: 0,
            shots_fired: 0,
            untraded_kills: 0,
            traded_deaths: 0,
        };
        assert_eq!(record.kd(), 0.0);
        assert_eq!(record.accuracy(), 0.0);
        assert_eq!(record.damage_per_kill(), 0.0);
        assert_eq!(record.kills_untraded_perc(), 0.0);
        assert_eq!(record.deaths_traded_perc(), 0.0);
        assert!(record.kd().is_finite());
    }

    #[test]
    fn map_score_tie_goes_to_guest() {
        let record = MatchRecord {
            match_id: 1,
            player: "Shotzzy".to_string(),
            side: TeamSide::Host,
            abbrev: "OPTX".to_string(),
            oppo_abbrev: "ATL".to_string(),
            game_mode: "CDL SnD".to_string(),
            game_map: "Tuscan".to_string(),
            host_score: 3,
            guest_score: 3,
            damage: 0.0,
            kills: 10,
            deaths: 5,
            first_blood_kills: 2,
            rotation_kills: 0,
            shots_hit: 50,
            shots_fired: 100,
            untraded_kills: 6,
            traded_deaths: 2,
        };
        assert_eq!(record.map_winner(), TeamSide::Guest);
        assert!(!record.is_winner());
    }

    #[test]
    fn side_labels_render_lowercase() {
        assert_eq!(TeamSide::Host.to_string(), "host");
        assert_eq!(SeriesTeam::Team2.to_string(), "team2");
    }
}
