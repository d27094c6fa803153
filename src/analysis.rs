use itertools::Itertools;
use serde::Serialize;

use crate::model::{ratio, GameMode, ModeExtras};
use crate::reshape::ShortRecord;

/// Convert a `MM:SS` gametime to decimal minutes (`"12:30"` is `12.5`).
/// Anything unparseable counts as zero.
pub fn gametime_minutes(gametime: &str) -> f64 {
    let Some((minutes, seconds)) = gametime.split(':').collect_tuple() else {
        return 0.0;
    };
    let minutes: f64 = minutes.trim().parse().unwrap_or_default();
    let seconds: f64 = seconds.trim().parse().unwrap_or_default();
    minutes + seconds / 60.0
}

/// Gametime rounded to the nearest whole minute, the precision every rate
/// statistic is aggregated at.
pub fn rounded_gametime_minutes(gametime: &str) -> u32 {
    gametime_minutes(gametime).round() as u32
}

/// A player's stats summed across maps, with rates normalized to a
/// 10-minute window.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerRates {
    pub player: String,
    pub maps_played: u32,
    pub kills: u32,
    pub deaths: u32,
    /// Sum of per-map whole-minute gametimes.
    pub gametime_minutes: u32,
    pub kd: f64,
    pub kills_per_10: f64,
    pub deaths_per_10: f64,
    pub engagements_per_10: f64,
    pub avg_kills_per_map: f64,
    /// First kills over first deaths; Search and Destroy only.
    pub first_kill_effectiveness: Option<f64>,
    /// Hill seconds per 10 minutes played; Hardpoint only.
    pub hill_time_per_10: Option<f64>,
}

#[derive(Debug, Default, Clone, Copy)]
struct PlayerTotals {
    maps_played: u32,
    kills: u32,
    deaths: u32,
    gametime_minutes: u32,
    first_kills: u32,
    first_deaths: u32,
    hill_time: u32,
}

/// Group short-format rows by player, sum the counters and derive
/// per-10-minute rate statistics.
///
/// With a mode filter the mode-specific extras are derived too; without one
/// only the mode-agnostic rates are meaningful and the extras stay unset.
pub fn aggregate_player_rates(
    records: &[ShortRecord],
    mode: Option<GameMode>,
) -> Vec<PlayerRates> {
    let mode_name = mode.map(|m| m.compact_name());
    let mut totals: Vec<(String, PlayerTotals)> = Vec::new();

    for record in records {
        if let Some(name) = &mode_name {
            if &record.mode != name {
                continue;
            }
        }
        let at = match totals.iter().position(|(p, _)| p == &record.player) {
            Some(at) => at,
            None => {
                totals.push((record.player.clone(), PlayerTotals::default()));
                totals.len() - 1
            }
        };
        let entry = &mut totals[at].1;
        entry.maps_played += 1;
        entry.kills += record.kills;
        entry.deaths += record.deaths;
        entry.gametime_minutes += rounded_gametime_minutes(&record.gametime);
        match record.extras {
            ModeExtras::Hardpoint { hill_time } => entry.hill_time += hill_time,
            ModeExtras::SearchAndDestroy {
                first_kill,
                first_death,
                ..
            } => {
                entry.first_kills += first_kill;
                entry.first_deaths += first_death;
            }
            ModeExtras::Control { .. } => {}
        }
    }

    totals
        .into_iter()
        .map(|(player, t)| {
            let minutes = t.gametime_minutes as f64;
            let kills_per_10 = ratio(t.kills as f64, minutes) * 10.0;
            let deaths_per_10 = ratio(t.deaths as f64, minutes) * 10.0;
            PlayerRates {
                player,
                maps_played: t.maps_played,
                kills: t.kills,
                deaths: t.deaths,
                gametime_minutes: t.gametime_minutes,
                kd: ratio(t.kills as f64, t.deaths as f64),
                kills_per_10,
                deaths_per_10,
                engagements_per_10: kills_per_10 + deaths_per_10,
                avg_kills_per_map: ratio(t.kills as f64, t.maps_played as f64),
                first_kill_effectiveness: match mode {
                    Some(GameMode::SearchAndDestroy) => {
                        Some(ratio(t.first_kills as f64, t.first_deaths as f64))
                    }
                    _ => None,
                },
                hill_time_per_10: match mode {
                    Some(GameMode::Hardpoint) => {
                        Some(ratio(t.hill_time as f64, minutes) * 10.0)
                    }
                    _ => None,
                },
            }
        })
        .collect_vec()
}

/// Keep one team's rows, optionally together with every row of the matches
/// that team appeared in (so opposition stats stay comparable).
pub fn filter_team_games<'a>(
    records: &'a [ShortRecord],
    team_name: &str,
    include_opposition: bool,
) -> Vec<&'a ShortRecord> {
    if include_opposition {
        let match_ids = records
            .iter()
            .filter(|r| r.team_name == team_name)
            .map(|r| r.match_id.as_str())
            .unique()
            .collect_vec();
        records
            .iter()
            .filter(|r| match_ids.contains(&r.match_id.as_str()))
            .collect_vec()
    } else {
        records
            .iter()
            .filter(|r| r.team_name == team_name)
            .collect_vec()
    }
}

/// Centering statistic for [`outlier_scores`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlierMethod {
    Mean,
    Median,
}

/// Score how far each `(x, y)` pair sits from the center of its columns:
/// the mean of `|x / center(xs) - 1|` and `|y / center(ys) - 1|`, each term
/// rounded to two decimals first and zeroed when the center is not
/// positive. Used to pick which points get labeled on scatter plots.
pub fn outlier_scores(xs: &[f64], ys: &[f64], method: OutlierMethod) -> Vec<f64> {
    let x_center = center(xs, method);
    let y_center = center(ys, method);
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| (deviation(x, x_center) + deviation(y, y_center)) / 2.0)
        .collect_vec()
}

fn deviation(value: f64, center: f64) -> f64 {
    if center > 0.0 {
        (round2(value / center) - 1.0).abs()
    } else {
        0.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn center(values: &[f64], method: OutlierMethod) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    match method {
        OutlierMethod::Mean => values.iter().sum::<f64>() / values.len() as f64,
        OutlierMethod::Median => {
            let sorted = values
                .iter()
                .copied()
                .sorted_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                .collect_vec();
            let mid = sorted.len() / 2;
            if sorted.len() % 2 == 0 {
                (sorted[mid - 1] + sorted[mid]) / 2.0
            } else {
                sorted[mid]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reshape::MapOutcome;

    fn hardpoint_record(player: &str, kills: u32, deaths: u32, gametime: &str) -> ShortRecord {
        ShortRecord {
            player: player.to_string(),
            kills,
            deaths,
            kd: 0.0,
            extras: ModeExtras::Hardpoint { hill_time: 60 },
            team_name: "New York Subliners".to_string(),
            team_score: 250,
            map_outcome: MapOutcome::Winner,
            match_id: "NYSLATW2M1".to_string(),
            map_winner: "Hamburg".to_string(),
            mode: "Hardpoint".to_string(),
            gametime: gametime.to_string(),
            match_winner: Some("New York Subliners".to_string()),
        }
    }

    fn snd_record(player: &str, first_kill: u32, first_death: u32) -> ShortRecord {
        ShortRecord {
            extras: ModeExtras::SearchAndDestroy {
                first_kill,
                first_death,
                plant: 1,
                defuse: 0,
            },
            mode: "SearchandDestroy".to_string(),
            ..hardpoint_record(player, 8, 6, "09:00")
        }
    }

    #[test]
    fn gametime_converts_then_rounds() {
        assert!((gametime_minutes("12:30") - 12.5).abs() < 1e-9);
        assert_eq!(rounded_gametime_minutes("12:30"), 13);
        assert_eq!(rounded_gametime_minutes("10:00"), 10);
        assert_eq!(rounded_gametime_minutes("garbage"), 0);
    }

    #[test]
    fn rates_normalize_to_ten_minutes() {
        let records = vec![hardpoint_record("HydraX", 20, 10, "12:30")];
        let rates = aggregate_player_rates(&records, Some(GameMode::Hardpoint));
        assert_eq!(rates.len(), 1);
        let r = &rates[0];
        // 20 kills over a rounded 13 minutes.
        assert!((r.kills_per_10 - 20.0 / 13.0 * 10.0).abs() < 1e-9);
        assert!((r.kills_per_10 - 15.38).abs() < 0.01);
        assert!((r.engagements_per_10 - (20.0 + 10.0) / 13.0 * 10.0).abs() < 1e-9);
        assert_eq!(r.gametime_minutes, 13);
        let hill = r.hill_time_per_10.unwrap();
        assert!((hill - 60.0 / 13.0 * 10.0).abs() < 1e-9);
        assert!(r.first_kill_effectiveness.is_none());
    }

    #[test]
    fn sums_across_maps_before_deriving() {
        let records = vec![
            hardpoint_record("HydraX", 20, 10, "10:00"),
            hardpoint_record("HydraX", 10, 20, "10:00"),
        ];
        let rates = aggregate_player_rates(&records, None);
        let r = &rates[0];
        assert_eq!(r.maps_played, 2);
        assert_eq!(r.kills, 30);
        assert!((r.kd - 1.0).abs() < 1e-9);
        assert!((r.kills_per_10 - 15.0).abs() < 1e-9);
        assert!((r.avg_kills_per_map - 15.0).abs() < 1e-9);
    }

    #[test]
    fn mode_filter_drops_other_modes() {
        let records = vec![
            hardpoint_record("HydraX", 20, 10, "10:00"),
            snd_record("HydraX", 3, 1),
        ];
        let rates = aggregate_player_rates(&records, Some(GameMode::SearchAndDestroy));
        let r = &rates[0];
        assert_eq!(r.maps_played, 1);
        assert_eq!(r.kills, 8);
        assert!((r.first_kill_effectiveness.unwrap() - 3.0).abs() < 1e-9);
        assert!(r.hill_time_per_10.is_none());
    }

    #[test]
    fn zero_time_player_has_zero_rates() {
        let records = vec![hardpoint_record("Bench", 0, 0, "00:00")];
        let rates = aggregate_player_rates(&records, None);
        let r = &rates[0];
        assert_eq!(r.kills_per_10, 0.0);
        assert_eq!(r.kd, 0.0);
        assert!(r.kills_per_10.is_finite());
    }

    #[test]
    fn team_filter_can_include_opposition() {
        let mut theirs = hardpoint_record("Envoy", 22, 18, "10:00");
        theirs.team_name = "Los Angeles Thieves".to_string();
        let mut other_match = hardpoint_record("Dashy", 25, 15, "10:00");
        other_match.team_name = "OpTic Texas".to_string();
        other_match.match_id = "OTATLW1M1".to_string();
        let records = vec![
            hardpoint_record("HydraX", 20, 10, "10:00"),
            theirs,
            other_match,
        ];

        let own = filter_team_games(&records, "New York Subliners", false);
        assert_eq!(own.len(), 1);
        let with_oppo = filter_team_games(&records, "New York Subliners", true);
        assert_eq!(with_oppo.len(), 2);
        assert!(with_oppo.iter().all(|r| r.match_id == "NYSLATW2M1"));
    }

    #[test]
    fn outlier_scores_flag_far_points() {
        let xs = [10.0, 10.0, 10.0, 30.0];
        let ys = [5.0, 5.0, 5.0, 15.0];
        let scores = outlier_scores(&xs, &ys, OutlierMethod::Median);
        assert!(scores[3] > scores[0]);
        assert!((scores[0] - 0.0).abs() < 1e-9);
    }

    #[test]
    fn empty_columns_score_zero() {
        assert!(outlier_scores(&[], &[], OutlierMethod::Mean).is_empty());
        let scores = outlier_scores(&[0.0, 0.0], &[0.0, 0.0], OutlierMethod::Mean);
        assert_eq!(scores, vec![0.0, 0.0]);
    }
}
