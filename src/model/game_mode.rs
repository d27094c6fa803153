use serde::Serialize;
use strum_macros::EnumString;

/// The three CDL gamemodes, each with its own scoreboard schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, strum_macros::Display)]
pub enum GameMode {
    Hardpoint,
    #[strum(serialize = "Search and Destroy")]
    SearchAndDestroy,
    Control,
}

impl GameMode {
    /// Number of scoreboard cells per player row for this mode.
    pub fn stride(self) -> usize {
        match self {
            GameMode::Hardpoint => 5,
            GameMode::SearchAndDestroy => 8,
            GameMode::Control => 5,
        }
    }

    /// Column names of a player row, in scoreboard order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            GameMode::Hardpoint => &["player", "kills", "deaths", "kd", "hill_time"],
            GameMode::SearchAndDestroy => &[
                "player",
                "kills",
                "deaths",
                "kd",
                "first_kill",
                "first_death",
                "plant",
                "defuse",
            ],
            GameMode::Control => &["player", "kills", "deaths", "kd", "captures"],
        }
    }

    /// Mode name with whitespace stripped, as used in short-format rows
    /// (`Search and Destroy` becomes `SearchandDestroy`).
    pub fn compact_name(self) -> String {
        self.to_string().replace(' ', "")
    }
}
