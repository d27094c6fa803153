use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::debug;

use crate::config::ExportConfig;
use crate::error::{CdlError, Result};
use crate::model::{MatchRecord, MatchSummaryRow, ModeExtras, ScoreboardPage};
use crate::reshape::{self, ShortRecord};

/// Which tabular view of a scoreboard week to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Long,
    Short,
}

impl FromStr for ExportFormat {
    type Err = CdlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "long" => Ok(ExportFormat::Long),
            "short" => Ok(ExportFormat::Short),
            other => Err(CdlError::InvalidFormat(other.to_string())),
        }
    }
}

/// Write one week's scoreboard to
/// `{data_location}/major{M}_week{W}_{format}.csv` and return the path.
pub fn write_week_csv(
    config: &ExportConfig,
    page: &ScoreboardPage,
    format: ExportFormat,
) -> Result<PathBuf> {
    fs::create_dir_all(&config.data_location)?;
    let path = config.data_location.join(format!(
        "major{}_week{}_{format}.csv",
        page.major, page.week
    ));
    match format {
        ExportFormat::Long => write_long(&path, page)?,
        ExportFormat::Short => write_short(&path, &reshape::short_format(page))?,
    }
    debug!(path = %path.display(), "wrote week csv");
    Ok(path)
}

fn write_long(path: &PathBuf, page: &ScoreboardPage) -> Result<()> {
    let table = reshape::long_format(page);
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Column names of a record's mode-specific counters.
fn extras_columns(extras: &ModeExtras) -> &'static [&'static str] {
    match extras {
        ModeExtras::Hardpoint { .. } => &["hill_time"],
        ModeExtras::SearchAndDestroy { .. } => &["first_kill", "first_death", "plant", "defuse"],
        ModeExtras::Control { .. } => &["captures"],
    }
}

fn extras_values(extras: &ModeExtras) -> Vec<(&'static str, String)> {
    match *extras {
        ModeExtras::Hardpoint { hill_time } => vec![("hill_time", hill_time.to_string())],
        ModeExtras::SearchAndDestroy {
            first_kill,
            first_death,
            plant,
            defuse,
        } => vec![
            ("first_kill", first_kill.to_string()),
            ("first_death", first_death.to_string()),
            ("plant", plant.to_string()),
            ("defuse", defuse.to_string()),
        ],
        ModeExtras::Control { captures } => vec![("captures", captures.to_string())],
    }
}

fn write_short(path: &PathBuf, records: &[ShortRecord]) -> Result<()> {
    // Weeks can mix modes in one file; the header is the union of the
    // per-mode columns in order of first appearance, and cells a mode does
    // not define stay empty.
    let mut extra_columns: Vec<&'static str> = Vec::new();
    for record in records {
        for col in extras_columns(&record.extras) {
            if !extra_columns.contains(col) {
                extra_columns.push(col);
            }
        }
    }

    let mut header = vec!["player", "kills", "deaths", "kd"];
    header.extend(&extra_columns);
    header.extend([
        "team_name",
        "team_score",
        "map_outcome",
        "matchID",
        "map_winner",
        "mode",
        "gametime",
        "match_winner",
    ]);

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&header)?;
    for record in records {
        let mut row = vec![
            record.player.clone(),
            record.kills.to_string(),
            record.deaths.to_string(),
            record.kd.to_string(),
        ];
        let values = extras_values(&record.extras);
        for col in &extra_columns {
            let cell = values
                .iter()
                .find(|(name, _)| name == col)
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            row.push(cell);
        }
        row.extend([
            record.team_name.clone(),
            record.team_score.to_string(),
            record.map_outcome.to_string(),
            record.match_id.clone(),
            record.map_winner.clone(),
            record.mode.clone(),
            record.gametime.clone(),
            record.match_winner.clone().unwrap_or_default(),
        ]);
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the flattened API records of one match to
/// `{data_location}/cdl_{match_id}.csv`, with the API's own column names.
pub fn write_match_records_csv(
    config: &ExportConfig,
    match_id: u64,
    records: &[MatchRecord],
) -> Result<PathBuf> {
    fs::create_dir_all(&config.data_location)?;
    let path = config.data_location.join(format!("cdl_{match_id}.csv"));
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record([
        "matchId",
        "alias",
        "team_type",
        "abbrev",
        "oppo_abbrev",
        "gameMode",
        "gameMap",
        "hostGameScore",
        "guestGameScore",
        "totalDamageDealt",
        "totalKills",
        "totalDeaths",
        "totalFirstBloodKills",
        "totalRotationKills",
        "totalShotsHit",
        "totalShotsFired",
        "totalKillsUntraded",
        "totalDeathsTraded",
    ])?;
    for r in records {
        writer.write_record([
            r.match_id.to_string(),
            r.player.clone(),
            r.side.to_string(),
            r.abbrev.clone(),
            r.oppo_abbrev.clone(),
            r.game_mode.clone(),
            r.game_map.clone(),
            r.host_score.to_string(),
            r.guest_score.to_string(),
            r.damage.to_string(),
            r.kills.to_string(),
            r.deaths.to_string(),
            r.first_blood_kills.to_string(),
            r.rotation_kills.to_string(),
            r.shots_hit.to_string(),
            r.shots_fired.to_string(),
            r.untraded_kills.to_string(),
            r.traded_deaths.to_string(),
        ])?;
    }
    writer.flush()?;
    debug!(path = %path.display(), records = records.len(), "wrote match records csv");
    Ok(path)
}

/// Write aggregated dual-team rows to
/// `{data_location}/match_summaries.csv`.
pub fn write_summary_csv(config: &ExportConfig, rows: &[MatchSummaryRow]) -> Result<PathBuf> {
    fs::create_dir_all(&config.data_location)?;
    let path = config.data_location.join("match_summaries.csv");
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record([
        "mode",
        "totalDamageDealt_team1",
        "teamKd_team1",
        "accuracy_team1",
        "rotationalPercent_team1",
        "fbPerc_team1",
        "totalDamageDealt_team2",
        "teamKd_team2",
        "accuracy_team2",
        "rotationalPercent_team2",
        "fbPerc_team2",
        "winner",
    ])?;
    for row in rows {
        writer.write_record([
            row.mode.clone(),
            row.damage_team1.to_string(),
            row.team_kd_team1.to_string(),
            row.accuracy_team1.to_string(),
            row.rotational_percent_team1.to_string(),
            row.fb_perc_team1.to_string(),
            row.damage_team2.to_string(),
            row.team_kd_team2.to_string(),
            row.accuracy_team2.to_string(),
            row.rotational_percent_team2.to_string(),
            row.fb_perc_team2.to_string(),
            row.winner.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(path)
}
