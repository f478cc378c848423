use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::trend::ScoreDelta;
use crate::core::cone::PercentileBracketSet;
use crate::core::primitives::decimal_to_f64;
use crate::core::types::{PillarScores, ScoreBucket};
use crate::core::windowing::trailing_months;
use crate::error::{ChartError, ChartResult};

/// Headline data for one company page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySnapshot {
    pub ticker: String,
    pub name: String,
    pub exchange: String,
    pub monk_score: f64,
    #[serde(default)]
    pub prev_monk_score: Option<f64>,
    pub pillars: PillarScores,
    pub current_price: Decimal,
    #[serde(default)]
    pub peers: Vec<String>,
}

impl CompanySnapshot {
    pub fn current_price_f64(&self) -> ChartResult<f64> {
        decimal_to_f64(self.current_price, "current_price")
    }

    #[must_use]
    pub fn score_bucket(&self) -> ScoreBucket {
        ScoreBucket::for_score(self.monk_score)
    }

    /// Change versus the previous score; flat when no previous score is known.
    #[must_use]
    pub fn score_delta(&self) -> ScoreDelta {
        self.prev_monk_score
            .map_or_else(ScoreDelta::flat, |prev| ScoreDelta::between(prev, self.monk_score))
    }

    /// `EXCHANGE:TICKER` form used in page routes.
    #[must_use]
    pub fn qualified_ticker(&self) -> String {
        format!("{}:{}", self.exchange, self.ticker)
    }
}

/// One dated score observation, optionally annotated with an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub date: NaiveDate,
    pub monk_score: f64,
    pub pillars: PillarScores,
    #[serde(default)]
    pub event: Option<String>,
}

impl ScoreSnapshot {
    #[must_use]
    pub fn new(date: NaiveDate, monk_score: f64, pillars: PillarScores) -> Self {
        Self {
            date,
            monk_score,
            pillars,
            event: None,
        }
    }

    #[must_use]
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }
}

/// Score history window, counted back from the latest sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HistoryRange {
    ThreeYears,
    FiveYears,
    #[default]
    Max,
}

impl HistoryRange {
    pub const ALL: [HistoryRange; 3] = [
        HistoryRange::ThreeYears,
        HistoryRange::FiveYears,
        HistoryRange::Max,
    ];

    #[must_use]
    pub const fn months(self) -> Option<u32> {
        match self {
            HistoryRange::ThreeYears => Some(36),
            HistoryRange::FiveYears => Some(60),
            HistoryRange::Max => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            HistoryRange::ThreeYears => "3Y",
            HistoryRange::FiveYears => "5Y",
            HistoryRange::Max => "MAX",
        }
    }

    #[must_use]
    pub fn apply(self, samples: &[ScoreSnapshot]) -> Vec<ScoreSnapshot> {
        match self.months() {
            Some(months) => trailing_months(samples, months, |sample| sample.date),
            None => samples.to_vec(),
        }
    }
}

/// Source of every dataset the charts consume.
///
/// Charts never read globals; hosts pass what a provider returns into the
/// chart controllers explicitly.
pub trait DataProvider {
    fn company(&self, ticker: &str) -> ChartResult<CompanySnapshot>;

    fn history(&self, ticker: &str, range: HistoryRange) -> ChartResult<Vec<ScoreSnapshot>>;

    fn percentile_brackets(&self, bucket: ScoreBucket) -> ChartResult<PercentileBracketSet>;

    /// Most recent `weeks` weekly closes, oldest first; fewer when history is shorter.
    fn price_history(&self, ticker: &str, weeks: usize) -> ChartResult<Vec<f64>>;
}

/// Provider backed by maps seeded by the caller.
///
/// Lookups accept a bare ticker (`AAPL`) or an exchange-qualified one
/// (`NASDAQ:AAPL`), case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataProvider {
    companies: IndexMap<String, CompanySnapshot>,
    histories: IndexMap<String, Vec<ScoreSnapshot>>,
    brackets: IndexMap<ScoreBucket, PercentileBracketSet>,
    prices: IndexMap<String, Vec<f64>>,
}

impl InMemoryDataProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_company(mut self, company: CompanySnapshot) -> Self {
        self.companies.insert(company.ticker.to_ascii_uppercase(), company);
        self
    }

    /// Stores `history` sorted by date.
    #[must_use]
    pub fn with_history(mut self, ticker: &str, mut history: Vec<ScoreSnapshot>) -> Self {
        history.sort_by_key(|sample| sample.date);
        self.histories.insert(ticker.to_ascii_uppercase(), history);
        self
    }

    #[must_use]
    pub fn with_brackets(mut self, bucket: ScoreBucket, brackets: PercentileBracketSet) -> Self {
        self.brackets.insert(bucket, brackets);
        self
    }

    #[must_use]
    pub fn with_price_history(mut self, ticker: &str, weekly_closes: Vec<f64>) -> Self {
        self.prices.insert(ticker.to_ascii_uppercase(), weekly_closes);
        self
    }

    #[must_use]
    pub fn tickers(&self) -> Vec<&str> {
        self.companies.keys().map(String::as_str).collect()
    }

    fn resolve_key(&self, ticker: &str) -> ChartResult<String> {
        let bare = ticker.rsplit(':').next().unwrap_or(ticker).trim();
        let key = bare.to_ascii_uppercase();
        if self.companies.contains_key(&key) {
            Ok(key)
        } else {
            Err(ChartError::UnknownTicker(ticker.to_owned()))
        }
    }
}

impl DataProvider for InMemoryDataProvider {
    fn company(&self, ticker: &str) -> ChartResult<CompanySnapshot> {
        let key = self.resolve_key(ticker)?;
        self.companies
            .get(&key)
            .cloned()
            .ok_or_else(|| ChartError::UnknownTicker(ticker.to_owned()))
    }

    fn history(&self, ticker: &str, range: HistoryRange) -> ChartResult<Vec<ScoreSnapshot>> {
        let key = self.resolve_key(ticker)?;
        Ok(self
            .histories
            .get(&key)
            .map(|history| range.apply(history))
            .unwrap_or_default())
    }

    fn percentile_brackets(&self, bucket: ScoreBucket) -> ChartResult<PercentileBracketSet> {
        self.brackets.get(&bucket).cloned().ok_or_else(|| {
            ChartError::InvalidData(format!(
                "no percentile brackets for bucket `{}`",
                bucket.key()
            ))
        })
    }

    fn price_history(&self, ticker: &str, weeks: usize) -> ChartResult<Vec<f64>> {
        let key = self.resolve_key(ticker)?;
        let closes = self.prices.get(&key).map_or(&[][..], Vec::as_slice);
        let start = closes.len().saturating_sub(weeks);
        Ok(closes[start..].to_vec())
    }
}

/// Generation number attached to one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FetchTicket {
    pub generation: u64,
}

/// Hands out fetch tickets and rejects results from superseded fetches.
///
/// Issuing a new ticket supersedes every older one, so a slow response for a
/// previous selection can never overwrite a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestGenerations {
    latest: u64,
}

impl RequestGenerations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> FetchTicket {
        self.latest += 1;
        FetchTicket {
            generation: self.latest,
        }
    }

    #[must_use]
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.latest
    }

    /// Passes `value` through when `ticket` is still current, discards it otherwise.
    pub fn accept<T>(&self, ticket: FetchTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            debug!(
                stale = ticket.generation,
                latest = self.latest,
                "discarding superseded fetch result"
            );
            None
        }
    }

    /// Invalidates every outstanding ticket without issuing a new one.
    pub fn cancel_all(&mut self) {
        self.latest += 1;
    }
}
