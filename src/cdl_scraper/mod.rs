pub(crate) mod match_stats;
pub(crate) mod scoreboard;

use scraper::Html;
use tracing::debug;

use crate::error::{CdlError, Result};

/// Fetch a URL and return the response body as text.
pub(crate) async fn get_body(client: &reqwest::Client, url: &str) -> Result<String> {
    debug!(url, "fetching page");

    let response = client.get(url).send().await.map_err(|e| CdlError::Http {
        url: url.to_owned(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CdlError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    response.text().await.map_err(|e| CdlError::ResponseBody {
        url: url.to_owned(),
        source: e,
    })
}

/// Fetch a URL and flatten the HTML document down to its visible text,
/// which is the representation the scoreboard parser works on.
pub(crate) async fn get_page_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let body = get_body(client, url).await?;
    let document = Html::parse_document(&body);
    Ok(document.root_element().text().collect())
}

/// Split `raw` on any of `delimiters`, dropping empty tokens. Every place
/// the scoreboard pipeline produces tokens goes through this.
pub(crate) fn tokenize(raw: &str, delimiters: &[char]) -> Vec<String> {
    raw.split(delimiters)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_empty_strings() {
        assert_eq!(
            tokenize("a##b&&c//d", &['#', '&', '/']),
            vec!["a", "b", "c", "d"]
        );
        assert!(tokenize("###", &['#']).is_empty());
    }
}
