use super::{
    normalize::{is_truthy, normalize},
    score::compute_score,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical breach record.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub name: String,
    pub domain: Option<String>,
    pub date: Option<String>,
    pub data_classes: Vec<String>,
    pub description: Option<String>,
    pub risk: Option<Value>,
    pub raw: Value,
}

/// Score and incidents from one risk fetch. Never merged with an earlier one.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RiskSnapshot {
    pub score: u8,
    pub incidents: Vec<Incident>,
}

impl RiskSnapshot {
    /// The "no data yet" snapshot.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalizes a payload; the fallback score applies when the backend
    /// reports none.
    #[must_use]
    pub fn from_payload(payload: &RawRiskPayload) -> Self {
        let incidents = normalize(payload.incident_list());
        let score = payload
            .reported_score()
            .unwrap_or_else(|| compute_score(&incidents));

        Self { score, incidents }
    }
}

/// Body of `GET /api/v1/incidents/risk`, in whatever shape the backend sent.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawRiskPayload(Value);

const SCORE_KEYS: [&str; 3] = ["riskScore", "score", "risk"];
const LIST_KEYS: [&str; 3] = ["breaches", "items", "sources"];

impl RawRiskPayload {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The payload, unwrapped from a `data` envelope when one is present.
    #[must_use]
    pub fn body(&self) -> &Value {
        match self.0.get("data") {
            Some(data) if is_truthy(data) => data,
            _ => &self.0,
        }
    }

    /// First non-null of `riskScore`, `score`, `risk`, rounded into `0..=100`.
    /// Non-numeric values count as absent.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn reported_score(&self) -> Option<u8> {
        let body = self.body();
        let value = SCORE_KEYS
            .iter()
            .filter_map(|key| body.get(*key))
            .find(|value| !value.is_null())?;

        let number = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|number| number.is_finite())?;

        Some(number.round().clamp(0.0, 100.0) as u8)
    }

    /// `incidents` when it is a list, otherwise the first truthy of
    /// `breaches`, `items`, `sources`.
    #[must_use]
    pub fn incident_list(&self) -> Option<&Value> {
        let body = self.body();
        match body.get("incidents") {
            Some(list @ Value::Array(_)) => Some(list),
            _ => LIST_KEYS
                .iter()
                .filter_map(|key| body.get(*key))
                .find(|value| is_truthy(value)),
        }
    }
}
