pub use aggregate::{aggregate_teams, api_mode_label, reshape_match, summary_feature_matrix};
pub use analysis::{
    aggregate_player_rates, filter_team_games, gametime_minutes, outlier_scores,
    rounded_gametime_minutes, OutlierMethod, PlayerRates,
};
pub use client::{BatchReport, CdlClient};
pub use config::ExportConfig;
pub use error::{CdlError, Result};
pub use events::check_event_exists;
pub use export::{write_match_records_csv, write_summary_csv, write_week_csv, ExportFormat};
pub use reshape::{create_match_id, long_format, short_format, LongTable, MapOutcome, ShortRecord};

pub mod aggregate;
pub mod analysis;
pub(crate) mod cdl_scraper;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod model;
pub mod reshape;

pub use model::*;
