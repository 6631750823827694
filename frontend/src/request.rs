// keep in sync with api.rs of backend
use anyhow::Result;
use chrono::NaiveDate;
use common::{req::HistoryResponse, FeedPage};
use reqwest::header::ACCEPT;

use crate::utils;

/// Long-poll wait asked from the feed endpoint.
pub const FEED_WAIT_MS: u64 = 20_000;

fn api_url(endpoint: &str) -> String {
    let host_url = host_url();
    format!("{host_url}/{endpoint}")
}

fn host_url() -> String {
    match web_sys::window().map(|w| w.location()) {
        Some(location) => format!(
            "{}//{}:8081",
            location.protocol().unwrap_or_else(|_| "http:".to_owned()),
            location.hostname().unwrap_or_else(|_| "127.0.0.1".to_owned())
        ),
        None => "http://127.0.0.1:8081".to_owned(),
    }
}

/// Next page of the live feed after `after`, waiting for new events.
pub async fn feed(after: Option<u64>) -> Result<FeedPage> {
    let client = reqwest::Client::new();

    let mut query = vec![("wait_ms", FEED_WAIT_MS)];
    if let Some(after) = after {
        query.push(("after", after));
    }

    Ok(client
        .get(api_url("api/feed"))
        .query(&query)
        .header(ACCEPT, "application/json")
        .send()
        .await?
        .error_for_status()?
        .json::<FeedPage>()
        .await?)
}

/// Readings of the local calendar day `date`.
pub async fn history(date: NaiveDate) -> Result<HistoryResponse> {
    let client = reqwest::Client::new();

    Ok(client
        .get(api_url("api/history"))
        .query(&[
            ("date", date.format("%Y-%m-%d").to_string()),
            ("tz_offset_min", utils::utc_offset_min(date).to_string()),
        ])
        .header(ACCEPT, "application/json")
        .send()
        .await?
        .error_for_status()?
        .json::<HistoryResponse>()
        .await?)
}
