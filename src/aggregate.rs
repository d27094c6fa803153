use itertools::Itertools;
use tracing::debug;

use crate::model::{
    GameMode, MatchRecord, MatchSummaryRow, SeriesTeam, TeamAggregate, TeamSide,
};

/// Sum each team's raw counters for every map it played, grouped by
/// (match, map, mode, team). Ratios live on [`TeamAggregate`] and are
/// always derived from these sums, never from per-player ratios.
pub fn aggregate_teams(records: &[MatchRecord]) -> Vec<TeamAggregate> {
    let mut aggregates: Vec<TeamAggregate> = Vec::new();
    for record in records {
        let existing = aggregates.iter().position(|a| {
            a.match_id == record.match_id
                && a.game_map == record.game_map
                && a.game_mode == record.game_mode
                && a.abbrev == record.abbrev
        });
        match existing {
            Some(at) => {
                let agg = &mut aggregates[at];
                agg.damage += record.damage;
                agg.kills += record.kills;
                agg.deaths += record.deaths;
                agg.first_blood_kills += record.first_blood_kills;
                agg.rotation_kills += record.rotation_kills;
                agg.shots_hit += record.shots_hit;
                agg.shots_fired += record.shots_fired;
            }
            None => aggregates.push(TeamAggregate {
                match_id: record.match_id,
                game_map: record.game_map.clone(),
                game_mode: record.game_mode.clone(),
                side: record.side,
                abbrev: record.abbrev.clone(),
                oppo_abbrev: record.oppo_abbrev.clone(),
                map_winner: record.map_winner(),
                host_score: record.host_score,
                guest_score: record.guest_score,
                damage: record.damage,
                kills: record.kills,
                deaths: record.deaths,
                first_blood_kills: record.first_blood_kills,
                rotation_kills: record.rotation_kills,
                shots_hit: record.shots_hit,
                shots_fired: record.shots_fired,
            }),
        }
    }
    aggregates
}

/// Condense player records into one dual-team feature row per map: the host
/// aggregate becomes the `_team1` side, its guest counterpart (joined on
/// match, map, mode and the two abbreviations) the `_team2` side.
///
/// Every emitted row names a winner; a map whose guest side is missing from
/// the input is dropped rather than half-filled.
pub fn reshape_match(records: &[MatchRecord]) -> Vec<MatchSummaryRow> {
    let aggregates = aggregate_teams(records);
    let (hosts, guests): (Vec<_>, Vec<_>) = aggregates
        .into_iter()
        .partition(|a| a.side == TeamSide::Host);

    let rows = hosts
        .iter()
        .filter_map(|host| {
            let guest = guests.iter().find(|g| {
                g.match_id == host.match_id
                    && g.game_map == host.game_map
                    && g.game_mode == host.game_mode
                    && g.host_abbrev() == host.host_abbrev()
                    && g.guest_abbrev() == host.guest_abbrev()
            })?;
            Some(MatchSummaryRow {
                mode: host.game_mode.clone(),
                damage_team1: host.damage,
                team_kd_team1: host.team_kd(),
                accuracy_team1: host.accuracy(),
                rotational_percent_team1: host.rotational_percent(),
                fb_perc_team1: host.fb_perc(),
                damage_team2: guest.damage,
                team_kd_team2: guest.team_kd(),
                accuracy_team2: guest.accuracy(),
                rotational_percent_team2: guest.rotational_percent(),
                fb_perc_team2: guest.fb_perc(),
                winner: match host.map_winner {
                    TeamSide::Host => SeriesTeam::Team1,
                    TeamSide::Guest => SeriesTeam::Team2,
                },
            })
        })
        .collect_vec();
    debug!(
        records = records.len(),
        rows = rows.len(),
        "reshaped match records"
    );
    rows
}

/// Strip summary rows down to the numeric feature matrix and labels the
/// external classifier trains on, filtered to one gamemode.
///
/// Per-mode columns that carry no signal for that mode are left out:
/// Hardpoint drops the first-blood rate, Control drops both the first-blood
/// and rotational rates, Search and Destroy drops the rotational rate.
pub fn summary_feature_matrix(
    rows: &[MatchSummaryRow],
    mode: GameMode,
) -> (Vec<Vec<f64>>, Vec<SeriesTeam>) {
    let label = api_mode_label(mode);
    let include_rotational = mode == GameMode::Hardpoint;
    let include_fb = mode == GameMode::SearchAndDestroy;

    let mut features = Vec::new();
    let mut labels = Vec::new();
    for row in rows.iter().filter(|r| r.mode == label) {
        let mut feature_row = vec![row.damage_team1, row.team_kd_team1, row.accuracy_team1];
        if include_rotational {
            feature_row.push(row.rotational_percent_team1);
        }
        if include_fb {
            feature_row.push(row.fb_perc_team1);
        }
        feature_row.extend([row.damage_team2, row.team_kd_team2, row.accuracy_team2]);
        if include_rotational {
            feature_row.push(row.rotational_percent_team2);
        }
        if include_fb {
            feature_row.push(row.fb_perc_team2);
        }
        features.push(feature_row);
        labels.push(row.winner);
    }
    (features, labels)
}

/// Gamemode labels as the CDL match-detail API spells them.
pub fn api_mode_label(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Hardpoint => "CDL Hardpoint",
        GameMode::SearchAndDestroy => "CDL SnD",
        GameMode::Control => "CDL Control",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        player: &str,
        side: TeamSide,
        kills: u32,
        deaths: u32,
        shots_hit: u32,
        shots_fired: u32,
    ) -> MatchRecord {
        let (abbrev, oppo_abbrev) = match side {
            TeamSide::Host => ("NYSL", "LAT"),
            TeamSide::Guest => ("LAT", "NYSL"),
        };
        MatchRecord {
            match_id: 8718,
            player: player.to_string(),
            side,
            abbrev: abbrev.to_string(),
            oppo_abbrev: oppo_abbrev.to_string(),
            game_mode: "CDL Hardpoint".to_string(),
            game_map: "Hotel".to_string(),
            host_score: 250,
            guest_score: 180,
            damage: 1000.0,
            kills,
            deaths,
            first_blood_kills: 1,
            rotation_kills: 3,
            shots_hit,
            shots_fired,
            untraded_kills: 0,
            traded_deaths: 0,
        }
    }

    fn full_map() -> Vec<MatchRecord> {
        vec![
            record("h1", TeamSide::Host, 25, 20, 100, 300),
            record("h2", TeamSide::Host, 20, 22, 90, 280),
            record("h3", TeamSide::Host, 18, 21, 85, 290),
            record("h4", TeamSide::Host, 17, 19, 80, 250),
            record("g1", TeamSide::Guest, 28, 18, 110, 310),
            record("g2", TeamSide::Guest, 20, 20, 95, 300),
            record("g3", TeamSide::Guest, 17, 21, 70, 260),
            record("g4", TeamSide::Guest, 17, 21, 75, 270),
        ]
    }

    #[test]
    fn sums_counters_per_team() {
        let aggregates = aggregate_teams(&full_map());
        assert_eq!(aggregates.len(), 2);
        let host = aggregates.iter().find(|a| a.side == TeamSide::Host).unwrap();
        assert_eq!(host.kills, 25 + 20 + 18 + 17);
        assert_eq!(host.deaths, 20 + 22 + 21 + 19);
        assert_eq!(host.shots_hit, 100 + 90 + 85 + 80);
        assert_eq!(host.first_blood_kills, 4);
    }

    #[test]
    fn ratios_come_from_summed_counters() {
        let aggregates = aggregate_teams(&full_map());
        let host = aggregates.iter().find(|a| a.side == TeamSide::Host).unwrap();
        let kills = 80.0;
        let deaths = 82.0;
        assert!((host.team_kd() - kills / deaths).abs() < 1e-9);
        assert!((host.accuracy() - 355.0 / 1120.0).abs() < 1e-9);
        assert!((host.rotational_percent() - 12.0 / kills).abs() < 1e-9);
        // rounds = 250 + 180
        assert!((host.fb_perc() - 4.0 / 430.0).abs() < 1e-9);
    }

    #[test]
    fn reshape_emits_one_row_per_map_with_winner() {
        let rows = reshape_match(&full_map());
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.winner, SeriesTeam::Team1);
        assert_eq!(row.mode, "CDL Hardpoint");
        assert!(row.team_kd_team1 > 0.0);
        assert!(row.team_kd_team2 > 0.0);
    }

    #[test]
    fn zeroed_counters_never_produce_nan() {
        let mut records = full_map();
        for r in &mut records {
            r.kills = 0;
            r.deaths = 0;
            r.shots_fired = 0;
            r.shots_hit = 0;
            r.host_score = 0;
            r.guest_score = 0;
        }
        let rows = reshape_match(&records);
        let row = &rows[0];
        for value in [
            row.team_kd_team1,
            row.accuracy_team1,
            row.rotational_percent_team1,
            row.fb_perc_team1,
            row.team_kd_team2,
        ] {
            assert_eq!(value, 0.0);
            assert!(value.is_finite());
        }
        // A 0-0 map still names a winner (the guest, by the strict host
        // comparison).
        assert_eq!(row.winner, SeriesTeam::Team2);
    }

    #[test]
    fn feature_matrix_filters_by_mode_and_trims_columns() {
        let rows = reshape_match(&full_map());
        let (features, labels) = summary_feature_matrix(&rows, GameMode::Hardpoint);
        assert_eq!(features.len(), 1);
        assert_eq!(labels, vec![SeriesTeam::Team1]);
        // damage, kd, accuracy, rotational per team; no first-blood rate.
        assert_eq!(features[0].len(), 8);

        let (none, _) = summary_feature_matrix(&rows, GameMode::Control);
        assert!(none.is_empty());
    }
}
