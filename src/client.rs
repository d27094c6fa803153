use tracing::{instrument, warn};

use crate::cdl_scraper;
use crate::error::{CdlError, Result};
use crate::model::{MatchRecord, ScoreboardPage};

/// The main entry point for fetching CDL data.
///
/// `CdlClient` wraps a [`reqwest::Client`] and exposes methods to fetch
/// wiki scoreboard pages and CDL match-detail stats.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> cdl_scraper::Result<()> {
/// use cdl_scraper::CdlClient;
///
/// let client = CdlClient::new();
/// let page = client.get_scoreboard(2, 1).await?;
/// println!("Found {} series", page.series.len());
/// # Ok(())
/// # }
/// ```
pub struct CdlClient {
    http: reqwest::Client,
}

impl CdlClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, headers, etc.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { http: client }
    }

    /// Fetch and parse one qualifying week's scoreboard page.
    ///
    /// The major/week pair is validated against the event calendar before
    /// any network work.
    #[instrument(skip(self))]
    pub async fn get_scoreboard(&self, major: u8, week: u8) -> Result<ScoreboardPage> {
        cdl_scraper::scoreboard::get_scoreboard(&self.http, major, week).await
    }

    /// Fetch per-player stats for one match from the CDL match-detail API.
    #[instrument(skip(self))]
    pub async fn get_match_stats(&self, match_id: u64) -> Result<Vec<MatchRecord>> {
        cdl_scraper::match_stats::get_match_stats(&self.http, match_id).await
    }

    /// Fetch stats for a batch of match ids. One id's failure never aborts
    /// the rest; failures are collected into the report instead.
    #[instrument(skip(self, match_ids))]
    pub async fn get_match_stats_batch(
        &self,
        match_ids: impl IntoIterator<Item = u64>,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for match_id in match_ids {
            match self.get_match_stats(match_id).await {
                Ok(records) => report.fetched.push((match_id, records)),
                Err(error) => {
                    warn!(match_id, %error, "skipping match");
                    report.failed.push((match_id, error));
                }
            }
        }
        report
    }

    /// Extract match ids from an arbitrary CDL page (standings, schedule).
    #[instrument(skip(self))]
    pub async fn get_match_ids(&self, url: &str) -> Result<Vec<u64>> {
        cdl_scraper::match_stats::get_match_ids(&self.http, url).await
    }
}

impl Default for CdlClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a batch fetch: which ids produced records and which failed,
/// with the reason kept per id.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub fetched: Vec<(u64, Vec<MatchRecord>)>,
    pub failed: Vec<(u64, CdlError)>,
}

impl BatchReport {
    /// All fetched records, flattened across matches.
    pub fn records(&self) -> impl Iterator<Item = &MatchRecord> {
        self.fetched.iter().flat_map(|(_, records)| records.iter())
    }

    pub fn failed_ids(&self) -> Vec<u64> {
        self.failed.iter().map(|(id, _)| *id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_batch_yields_empty_report() {
        let client = CdlClient::new();
        let report = client.get_match_stats_batch(std::iter::empty()).await;
        assert!(report.fetched.is_empty());
        assert!(report.failed.is_empty());
        assert_eq!(report.records().count(), 0);
        assert!(report.failed_ids().is_empty());
    }
}
