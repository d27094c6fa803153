use itertools::Itertools;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::cdl_scraper;
use crate::error::{CdlError, Result};
use crate::model::{MatchRecord, TeamSide};

const MATCH_DETAIL_URL: &str =
    "https://cdl-other-services.abe-arsfutura.com/production/v2/content-types/match-detail/bltd79e337aca601012";

/// Players the API reports per team per map.
const PLAYERS_PER_TEAM: usize = 4;

#[derive(Debug, Deserialize)]
struct MatchDetailResponse {
    data: MatchDetailData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchDetailData {
    match_data: MatchData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchData {
    match_extended: MatchExtended,
    match_stats: MatchStats,
    #[serde(default)]
    match_games_extended: Vec<MatchGameExtended>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchExtended {
    home_team_card: TeamCard,
    away_team_card: TeamCard,
}

#[derive(Debug, Deserialize)]
struct TeamCard {
    abbreviation: String,
}

#[derive(Debug, Deserialize)]
struct MatchStats {
    matches: TeamMatches,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamMatches {
    #[serde(default)]
    host_team: Vec<TeamGame>,
    #[serde(default)]
    guest_team: Vec<TeamGame>,
}

/// One team's entry for one map: the mode/map join keys plus the per-player
/// stat objects.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamGame {
    game_mode: String,
    game_map: String,
    #[serde(default)]
    stats: Vec<PlayerGameStats>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerGameStats {
    #[serde(default)]
    alias: String,
    #[serde(default)]
    total_damage_dealt: f64,
    #[serde(default)]
    total_kills: u32,
    #[serde(default)]
    total_deaths: u32,
    #[serde(default)]
    total_first_blood_kills: u32,
    #[serde(default)]
    total_rotation_kills: u32,
    #[serde(default)]
    total_shots_hit: u32,
    #[serde(default)]
    total_shots_fired: u32,
    #[serde(default)]
    total_kills_untraded: u32,
    #[serde(default)]
    total_deaths_traded: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchGameExtended {
    match_game: MatchGameMeta,
    match_game_result: MatchGameResult,
}

#[derive(Debug, Deserialize)]
struct MatchGameMeta {
    mode: String,
    map: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchGameResult {
    #[serde(default)]
    host_game_score: u32,
    #[serde(default)]
    guest_game_score: u32,
}

#[instrument(skip(client))]
pub(crate) async fn get_match_stats(
    client: &reqwest::Client,
    match_id: u64,
) -> Result<Vec<MatchRecord>> {
    let url = format!("{MATCH_DETAIL_URL}?options={{\"id\":{match_id}}}");
    debug!(url, "fetching match detail");

    let response = client
        .get(&url)
        .headers(cdl_headers())
        .send()
        .await
        .map_err(|e| CdlError::Http {
            url: url.clone(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CdlError::UnexpectedStatus { url, status });
    }

    let detail: MatchDetailResponse =
        response
            .json()
            .await
            .map_err(|e| CdlError::Json {
                url: url.clone(),
                source: e,
            })?;

    let records = flatten(match_id, detail);
    debug!(match_id, records = records.len(), "parsed match detail");
    Ok(records)
}

/// The CDL site rejects requests without its expected browser headers.
fn cdl_headers() -> reqwest::header::HeaderMap {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/110.0",
        ),
    );
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        REFERER,
        HeaderValue::from_static("https://www.callofdutyleague.com/"),
    );
    headers.insert(
        ORIGIN,
        HeaderValue::from_static("https://www.callofdutyleague.com"),
    );
    headers.insert("x-origin", HeaderValue::from_static("callofdutyleague.com"));
    headers
}

/// Flatten the nested match-detail payload into one record per player per
/// map, joining each team game to its map result on (mode, map).
fn flatten(match_id: u64, detail: MatchDetailResponse) -> Vec<MatchRecord> {
    let match_data = detail.data.match_data;
    let host_abbrev = match_data.match_extended.home_team_card.abbreviation;
    let guest_abbrev = match_data.match_extended.away_team_card.abbreviation;
    let games = match_data.match_games_extended;

    let sided = match_data
        .match_stats
        .matches
        .host_team
        .into_iter()
        .map(|g| (TeamSide::Host, g))
        .chain(
            match_data
                .match_stats
                .matches
                .guest_team
                .into_iter()
                .map(|g| (TeamSide::Guest, g)),
        );

    sided
        .flat_map(|(side, game)| {
            let TeamGame {
                game_mode,
                game_map,
                stats,
            } = game;
            let (host_score, guest_score) = games
                .iter()
                .find(|meta| meta.match_game.mode == game_mode && meta.match_game.map == game_map)
                .map(|meta| {
                    (
                        meta.match_game_result.host_game_score,
                        meta.match_game_result.guest_game_score,
                    )
                })
                .unwrap_or_default();
            let (abbrev, oppo_abbrev) = match side {
                TeamSide::Host => (host_abbrev.clone(), guest_abbrev.clone()),
                TeamSide::Guest => (guest_abbrev.clone(), host_abbrev.clone()),
            };

            stats
                .into_iter()
                .take(PLAYERS_PER_TEAM)
                .map(move |player| MatchRecord {
                    match_id,
                    player: player.alias,
                    side,
                    abbrev: abbrev.clone(),
                    oppo_abbrev: oppo_abbrev.clone(),
                    game_mode: game_mode.clone(),
                    game_map: game_map.clone(),
                    host_score,
                    guest_score,
                    damage: player.total_damage_dealt,
                    kills: player.total_kills,
                    deaths: player.total_deaths,
                    first_blood_kills: player.total_first_blood_kills,
                    rotation_kills: player.total_rotation_kills,
                    shots_hit: player.total_shots_hit,
                    shots_fired: player.total_shots_fired,
                    untraded_kills: player.total_kills_untraded,
                    traded_deaths: player.total_deaths_traded,
                })
                .collect_vec()
        })
        .collect_vec()
}

/// Pull `match/<id>` links out of an arbitrary CDL page body.
#[instrument(skip(client))]
pub(crate) async fn get_match_ids(client: &reqwest::Client, url: &str) -> Result<Vec<u64>> {
    let body = cdl_scraper::get_body(client, url).await?;
    Ok(extract_match_ids(&body))
}

fn extract_match_ids(body: &str) -> Vec<u64> {
    // Ids appear both as `match/<id>` links and inline `"match":{"id":<id>}`
    // blobs in the page's embedded state.
    const INLINE_MARKER: &str = "\"match\":{\"id\":";
    let from_links = body
        .split_whitespace()
        .filter_map(|token| token.find("match/").map(|at| &token[at + "match/".len()..]));
    let from_state = body
        .match_indices(INLINE_MARKER)
        .map(|(at, _)| &body[at + INLINE_MARKER.len()..]);
    from_links
        .chain(from_state)
        .map(|rest| {
            rest.chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .filter_map(|digits| digits.parse().ok())
        .collect_vec()
}
