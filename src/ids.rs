use std::ops::RangeInclusive;
use std::sync::OnceLock;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use reqwest::StatusCode;
use tracing::info;

use crate::config::{random_user_agent, Config, RunMode};
use crate::error::{AppError, Result};
use crate::types::MatchId;

fn listing_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"A\[[0-9]{1,4}\]=\[([0-9]{7}),").expect("listing pattern is valid"))
}

/// Every ID from `start` to `end`, both included. Never materialized.
pub fn id_range(start: MatchId, end: MatchId) -> RangeInclusive<MatchId> {
    start..=end
}

/// The run's match IDs, in the order workers pull them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkList {
    Range(RangeInclusive<MatchId>),
    Listed(Vec<MatchId>),
}

impl WorkList {
    /// Number of IDs, computed without walking the range.
    pub fn count(&self) -> u64 {
        match self {
            WorkList::Range(r) if r.is_empty() => 0,
            WorkList::Range(r) => (r.end() - r.start()).saturating_add(1),
            WorkList::Listed(ids) => ids.len() as u64,
        }
    }
}

impl IntoIterator for WorkList {
    type Item = MatchId;
    type IntoIter = Box<dyn Iterator<Item = MatchId> + Send>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            WorkList::Range(r) => Box::new(r),
            WorkList::Listed(ids) => Box::new(ids.into_iter()),
        }
    }
}

/// Listing query for `date`, e.g. `…&date=2024-1-2` (no zero padding).
pub fn listing_url(base: &str, date: NaiveDate) -> String {
    format!("{base}&date={}-{}-{}", date.year(), date.month(), date.day())
}

/// Pull match IDs out of the listing body's `A[n]=[1234567,…` entries, in order.
pub fn parse_listing_ids(body: &str) -> Vec<MatchId> {
    listing_pattern()
        .captures_iter(body)
        .filter_map(|caps| caps[1].parse::<MatchId>().ok())
        .collect()
}

/// Fetch the IDs of every match listed for `date`. Anything but HTTP 200 is
/// [`AppError::SourceUnavailable`].
pub async fn fetch_daily_ids(base_url: &str, date: NaiveDate) -> Result<Vec<MatchId>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(random_user_agent())
        .build()?;

    let url = listing_url(base_url, date);
    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|e| AppError::SourceUnavailable(format!("GET {url} failed: {e}")))?;

    let status = resp.status();
    if status != StatusCode::OK {
        return Err(AppError::SourceUnavailable(format!(
            "daily matches listing returned {status}"
        )));
    }

    let body = resp
        .text()
        .await
        .map_err(|e| AppError::SourceUnavailable(format!("reading listing body failed: {e}")))?;
    Ok(parse_listing_ids(&body))
}

/// Resolve the run's work list. Failure here aborts the run before any worker starts.
pub async fn resolve_ids(cfg: &Config) -> Result<WorkList> {
    match cfg.mode {
        RunMode::Range { start, end } => Ok(WorkList::Range(id_range(start, end))),
        RunMode::Today => {
            let today = Local::now().date_naive();
            let ids = fetch_daily_ids(&cfg.daily_matches_url, today).await?;
            info!("[SOURCE] {} matches listed for {today}", ids.len());
            Ok(WorkList::Listed(ids))
        }
    }
}
