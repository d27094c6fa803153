/// All errors that can occur during CDL scraping and export operations.
#[derive(thiserror::Error, Debug)]
pub enum CdlError {
    /// The requested major/week pair is outside the known event calendar.
    #[error("major {major} week {week} is not a valid CDL event, please enter a valid major/week combination")]
    MajorDoesNotExist { major: u8, week: u8 },

    /// The major/week pair is valid but no scoreboard data has been published yet.
    #[error("major {major} week {week} is valid but is yet to be played or have data uploaded")]
    MajorNotPlayed { major: u8, week: u8 },

    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// Failed to deserialize the match-detail API response.
    #[error("failed to decode json from {url}: {source}")]
    Json {
        url: String,
        source: reqwest::Error,
    },

    /// An export format string other than `long` or `short` was supplied.
    #[error("unknown export format {0:?}, expected \"long\" or \"short\"")]
    InvalidFormat(String),

    /// Failed to write a CSV artifact.
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem error while creating the output directory or file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CdlError>;
