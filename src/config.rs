use std::path::PathBuf;

/// Where CSV artifacts get written.
///
/// Passed explicitly into the export entry points; there is no process-wide
/// save location.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output directory for CSV artifacts, created on first write.
    pub data_location: PathBuf,
}

impl ExportConfig {
    pub fn new(data_location: impl Into<PathBuf>) -> Self {
        Self {
            data_location: data_location.into(),
        }
    }

    /// Read the save location from the `DATA_LOCATION` environment variable
    /// (a `.env` file is honored), falling back to `./data`.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let data_location = std::env::var("DATA_LOCATION").unwrap_or_else(|_| "data".to_string());
        Self::new(data_location)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::new("data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_data_dir() {
        assert_eq!(ExportConfig::default().data_location, PathBuf::from("data"));
    }
}
