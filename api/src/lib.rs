pub mod calendar;
pub mod client;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Calendar types — the only responses we reshape client-side
// ---------------------------------------------------------------------------

/// One tournament listing from `/v1/calendar/{history,active}`.
///
/// The fields the client looks at are kept as raw JSON so an odd type never
/// fails the whole listing. `None` means the field was absent; an explicit
/// `null` is `Some(Value::Null)`. Everything else rides along in `extra`, so an
/// entry serializes back out exactly as it came in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    /// Number on current endpoints, occasionally a string.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub tournament_id: Option<Value>,
    /// Legacy identifier, only consulted when `tournament_id` is missing or null.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<Value>,
    /// Region within the country. Unreliable outside the US and Canada.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Any value that is present, `null` included.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl CalendarEntry {
    /// The state, when the service sent it as a string.
    pub fn state(&self) -> Option<&str> {
        self.state.as_ref().and_then(Value::as_str)
    }

    /// Key this entry is indexed under, with numbers and strings folded into
    /// the same key space as a JSON object's keys: `1`, `1.0` and `"1"` all
    /// become `"1"`.
    pub fn id_key(&self) -> Option<String> {
        let id = [&self.tournament_id, &self.calendar_id]
            .into_iter()
            .flatten()
            .find(|v| !v.is_null())?;
        match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(number_key(n)),
            other => Some(other.to_string()),
        }
    }
}

fn number_key(n: &serde_json::Number) -> String {
    match n.as_f64() {
        // Integral floats print without the fraction; 2^53 bounds exact integers.
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

/// Wire envelope of a calendar listing. Other top-level fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarResponse {
    #[serde(default)]
    pub calendar: Option<Vec<CalendarEntry>>,
}

/// Filtered calendar plus an id → entry dictionary built from it.
///
/// Both fields are `None` when the service sent no calendar at all, in which
/// case the value serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CalendarResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<Vec<CalendarEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary: Option<BTreeMap<String, CalendarEntry>>,
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingOrder {
    Points,
    Rating,
    EffPct,
}

impl RankingOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            RankingOrder::Points => "points",
            RankingOrder::Rating => "rating",
            RankingOrder::EffPct => "eff_pct",
        }
    }
}

impl fmt::Display for RankingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "points" => Ok(RankingOrder::Points),
            "rating" => Ok(RankingOrder::Rating),
            "eff_pct" => Ok(RankingOrder::EffPct),
            other => Err(format!(
                "unknown ranking order {other:?} (expected points, rating or eff_pct)"
            )),
        }
    }
}

/// Optional controls for `/v1/rankings`. Unset (or zero) values are left off
/// the request and the service applies its own defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankingsQuery {
    /// 1-based position of the first ranking returned.
    pub start_pos: Option<u32>,
    pub count: Option<u32>,
    pub order: Option<RankingOrder>,
}

impl RankingsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_pos(mut self, start_pos: u32) -> Self {
        self.start_pos = Some(start_pos);
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn order(mut self, order: RankingOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(start_pos) = self.start_pos.filter(|&n| n > 0) {
            pairs.push(("start_pos", start_pos.to_string()));
        }
        if let Some(count) = self.count.filter(|&n| n > 0) {
            pairs.push(("count", count.to_string()));
        }
        if let Some(order) = self.order {
            pairs.push(("order", order.as_str().to_owned()));
        }
        pairs
    }
}
