use std::str::FromStr;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cdl_scraper::{self, tokenize};
use crate::error::{CdlError, Result};
use crate::events;
use crate::model::{
    ControlRow, GameMap, GameMode, HardpointRow, MapInfo, PlayerStats, ScoreboardPage,
    SearchAndDestroyRow, Series, MAPS_PER_SERIES, PLAYERS_PER_MAP,
};

/// Marker preceding each map block on the wiki page.
const MAP_BLOCK_MARKER: &str = "[showhide]";
/// Doubled word-joiner separating map info from the two team stat blocks.
const SECTION_JOINER: &str = "\u{2060}\u{2060}";
/// Token delimiters within a map block (newlines are rewritten to `#`).
const DELIMITERS: &[char] = &['#', '&', '/'];
/// Scoreboard placeholder for a map that was never played.
const DNP: &str = "DNP";

#[instrument(skip(client))]
pub(crate) async fn get_scoreboard(
    client: &reqwest::Client,
    major: u8,
    week: u8,
) -> Result<ScoreboardPage> {
    events::check_event_exists(major, week)?;
    let url = events::scoreboard_url(major, week);
    let text = cdl_scraper::get_page_text(client, &url).await?;
    let page = parse_scoreboard(major, week, &text)?;
    debug!(major, week, series = page.series.len(), "parsed scoreboard");
    Ok(page)
}

/// Parse a whole scoreboard page's visible text into series.
///
/// A valid event whose page holds no map blocks yet reports
/// [`CdlError::MajorNotPlayed`].
pub(crate) fn parse_scoreboard(major: u8, week: u8, text: &str) -> Result<ScoreboardPage> {
    let series = split_segments(text)
        .into_iter()
        .map(|maps| Series::new(maps.iter().map(|t| parse_map(t)).collect()))
        .collect_vec();
    if series.is_empty() {
        return Err(CdlError::MajorNotPlayed { major, week });
    }
    Ok(ScoreboardPage {
        major,
        week,
        series,
    })
}

/// Break the page text into per-series groups of five token lists, one per
/// map slot. Incomplete trailing groups are dropped.
fn split_segments(text: &str) -> Vec<Vec<Vec<String>>> {
    let flattened = text.replace('\n', "#");
    let blocks = flattened
        .split(MAP_BLOCK_MARKER)
        .skip(1)
        .map(|block| tokenize(block, DELIMITERS))
        .collect_vec();
    blocks
        .chunks(MAPS_PER_SERIES)
        .filter(|chunk| chunk.len() == MAPS_PER_SERIES)
        .map(|chunk| chunk.to_vec())
        .collect_vec()
}

/// Parse one map's token list. Anything that does not look like a played
/// map with a recognizable header and gamemode comes back as unplayed; a
/// single malformed map never aborts its series.
fn parse_map(tokens: &[String]) -> GameMap {
    if tokens.len() < 2 || tokens[1] == DNP {
        return GameMap::unplayed();
    }

    // The joiner characters survive tokenization, so re-joining the tokens
    // and splitting on the doubled joiner recovers the three sections:
    // map info, team 1 stats, team 2 stats.
    let joined = tokens.join("::");
    let sections = joined
        .split(SECTION_JOINER)
        .map(|s| {
            s.split("::")
                .filter(|t| !t.is_empty())
                .map(|t| t.to_string())
                .collect_vec()
        })
        .collect_vec();
    if sections.len() < 3 {
        debug!(?tokens, "map segment missing stat sections, skipping");
        return GameMap::unplayed();
    }

    let Some(info) = parse_map_info(&sections[0]) else {
        debug!("unparseable map header, skipping map");
        return GameMap::unplayed();
    };
    let stats = parse_stats(info.mode, &sections[1], &sections[2]);
    GameMap::played(info, stats)
}

/// Decode the seven header fields: team1, team1 score, team2 score, team2,
/// map name, duration, mode.
fn parse_map_info(fields: &[String]) -> Option<MapInfo> {
    if fields.len() < 7 {
        return None;
    }
    let team1_score = fields[1].trim().parse().ok()?;
    let team2_score = fields[2].trim().parse().ok()?;
    let mode = GameMode::from_str(fields[6].replace("Mode:", "").trim()).ok()?;
    Some(MapInfo {
        team1: fields[0].trim().to_string(),
        team2: fields[3].trim().to_string(),
        team1_score,
        team2_score,
        map_name: fields[4].replace("Map:", "").trim().to_string(),
        duration: fields[5].trim().to_string(),
        mode,
    })
}

/// Stride through both teams' flat token lists and build the typed stats
/// table for `mode`, normalized to exactly eight rows.
fn parse_stats(mode: GameMode, team1: &[String], team2: &[String]) -> PlayerStats {
    let stride = mode.stride();
    // Team 2's list carries trailing page noise; cut it to four full rows.
    // Team 1's list is used as-is.
    let team2 = &team2[..team2.len().min(stride * 4)];
    let chunks = team1.chunks(stride).chain(team2.chunks(stride));

    match mode {
        GameMode::Hardpoint => PlayerStats::Hardpoint(normalized(
            chunks
                .map(|c| HardpointRow {
                    player: text_cell(c, 0),
                    kills: int_cell(c, 1),
                    deaths: int_cell(c, 2),
                    kd: float_cell(c, 3),
                    hill_time: int_cell(c, 4),
                })
                .collect(),
            || HardpointRow {
                player: "0".to_string(),
                kills: 0,
                deaths: 0,
                kd: 0.0,
                hill_time: 0,
            },
        )),
        GameMode::SearchAndDestroy => PlayerStats::SearchAndDestroy(normalized(
            chunks
                .map(|c| SearchAndDestroyRow {
                    player: text_cell(c, 0),
                    kills: int_cell(c, 1),
                    deaths: int_cell(c, 2),
                    kd: float_cell(c, 3),
                    first_kill: int_cell(c, 4),
                    first_death: int_cell(c, 5),
                    plant: int_cell(c, 6),
                    defuse: int_cell(c, 7),
                })
                .collect(),
            || SearchAndDestroyRow {
                player: "0".to_string(),
                kills: 0,
                deaths: 0,
                kd: 0.0,
                first_kill: 0,
                first_death: 0,
                plant: 0,
                defuse: 0,
            },
        )),
        GameMode::Control => PlayerStats::Control(normalized(
            chunks
                .map(|c| ControlRow {
                    player: text_cell(c, 0),
                    kills: int_cell(c, 1),
                    deaths: int_cell(c, 2),
                    kd: float_cell(c, 3),
                    captures: int_cell(c, 4),
                })
                .collect(),
            || ControlRow {
                player: "0".to_string(),
                kills: 0,
                deaths: 0,
                kd: 0.0,
                captures: 0,
            },
        )),
    }
}

/// Pad with zero rows (or truncate) to exactly eight entries.
fn normalized<T>(mut rows: Vec<T>, zero_row: impl Fn() -> T) -> Vec<T> {
    rows.truncate(PLAYERS_PER_MAP);
    while rows.len() < PLAYERS_PER_MAP {
        rows.push(zero_row());
    }
    rows
}

fn text_cell(chunk: &[String], index: usize) -> String {
    chunk.get(index).map(|s| s.trim().to_string()).unwrap_or_default()
}

fn int_cell(chunk: &[String], index: usize) -> u32 {
    chunk
        .get(index)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_default()
}

fn float_cell(chunk: &[String], index: usize) -> f64 {
    chunk
        .get(index)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build one map block's raw text the way the wiki renders it: newline
    /// separated cells, with doubled word-joiners fencing off the two team
    /// stat sections.
    fn hardpoint_block(team1: &str, team2: &str, s1: u32, s2: u32) -> String {
        let mut cells = vec![
            team1.to_string(),
            s1.to_string(),
            s2.to_string(),
            team2.to_string(),
            "Map: Hamburg".to_string(),
            "11:32".to_string(),
            "Mode: Hardpoint".to_string(),
            SECTION_JOINER.to_string(),
        ];
        for p in 1..=4 {
            cells.extend([
                format!("alpha{p}"),
                "20".to_string(),
                "18".to_string(),
                "1.11".to_string(),
                "95".to_string(),
            ]);
        }
        cells.push(SECTION_JOINER.to_string());
        for p in 1..=4 {
            cells.extend([
                format!("bravo{p}"),
                "18".to_string(),
                "20".to_string(),
                "0.9".to_string(),
                "80".to_string(),
            ]);
        }
        // Trailing navigation noise after team 2's rows.
        cells.extend(["edit".to_string(), "history".to_string()]);
        cells.join("\n")
    }

    fn dnp_block() -> String {
        "Map 5\nDNP".to_string()
    }

    fn page_with_one_series() -> String {
        let mut page = String::from("2023 Season Scoreboards\n");
        for _ in 0..3 {
            page.push_str(MAP_BLOCK_MARKER);
            page.push_str(&hardpoint_block("New York Subliners", "Los Angeles Thieves", 250, 180));
            page.push('\n');
        }
        for _ in 0..2 {
            page.push_str(MAP_BLOCK_MARKER);
            page.push_str(&dnp_block());
            page.push('\n');
        }
        page
    }

    #[test]
    fn page_splits_into_five_map_series() {
        let page = parse_scoreboard(2, 1, &page_with_one_series()).unwrap();
        assert_eq!(page.series.len(), 1);
        let series = &page.series[0];
        assert_eq!(series.maps.len(), 5);
        assert_eq!(series.maps.iter().filter(|m| m.as_played().is_some()).count(), 3);
        assert_eq!(series.winner(), Some("New York Subliners"));
    }

    #[test]
    fn empty_page_reports_major_not_played() {
        let err = parse_scoreboard(2, 1, "nothing here yet").unwrap_err();
        assert!(matches!(err, CdlError::MajorNotPlayed { major: 2, week: 1 }));
    }

    #[test]
    fn stats_tables_always_hold_eight_rows() {
        let block = hardpoint_block("A Team", "B Team", 250, 100);
        let tokens = tokenize(&block.replace('\n', "#"), DELIMITERS);
        let map = parse_map(&tokens);
        let stats = map.stats().unwrap();
        assert_eq!(stats.len(), PLAYERS_PER_MAP);
        assert_eq!(stats.mode(), GameMode::Hardpoint);
        // Team 2 trailing noise must not leak into the rows.
        let last = stats.line(7);
        assert_eq!(last.player, "bravo4");
    }

    #[test]
    fn short_rosters_are_zero_padded_to_eight() {
        // Only two players recovered for team 1, none for team 2.
        let team1: Vec<String> = [
            "solo1", "10", "8", "1.25", "60", "solo2", "9", "9", "1.0", "55",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let stats = parse_stats(GameMode::Hardpoint, &team1, &[]);
        assert_eq!(stats.len(), PLAYERS_PER_MAP);
        let padded = stats.line(5);
        assert_eq!(padded.player, "0");
        assert_eq!(padded.kills, 0);
    }

    #[test]
    fn dnp_maps_carry_no_data() {
        let tokens = tokenize(&dnp_block().replace('\n', "#"), DELIMITERS);
        let map = parse_map(&tokens);
        assert!(map.info().is_none());
        assert!(map.stats().is_none());
    }

    #[test]
    fn unknown_gamemode_is_skipped() {
        let block = hardpoint_block("A", "B", 3, 1).replace("Mode: Hardpoint", "Mode: Gunfight");
        let tokens = tokenize(&block.replace('\n', "#"), DELIMITERS);
        let map = parse_map(&tokens);
        assert!(map.as_played().is_none());
    }

    #[test]
    fn snd_rows_use_stride_eight() {
        let mut team1: Vec<String> = Vec::new();
        for p in 1..=4 {
            team1.extend([
                format!("p{p}"),
                "8".to_string(),
                "5".to_string(),
                "1.6".to_string(),
                "2".to_string(),
                "1".to_string(),
                "1".to_string(),
                "0".to_string(),
            ]);
        }
        let team2 = team1.clone();
        let stats = parse_stats(GameMode::SearchAndDestroy, &team1, &team2);
        assert_eq!(stats.len(), 8);
        let line = stats.line(0);
        assert_eq!(line.kills, 8);
        match line.extras {
            crate::model::ModeExtras::SearchAndDestroy {
                first_kill, plant, ..
            } => {
                assert_eq!(first_kill, 2);
                assert_eq!(plant, 1);
            }
            _ => panic!("expected snd extras"),
        }
    }
}
