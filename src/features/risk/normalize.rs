//! Incident normalization. Breach records arrive in several shapes (the
//! breach-notification API uses `Name`/`BreachDate`/`DataClasses`, the custom
//! backend uses `name`/`date`/`dataClasses`, older feeds use `title`/`leaked`);
//! each canonical field is read through an ordered chain of candidate keys.

use super::types::Incident;
use serde_json::{Map, Value};

/// Candidate keys for one canonical field, in priority order. The first key
/// holding a truthy value wins.
struct FieldChain(&'static [&'static str]);

const NAME: FieldChain = FieldChain(&["Name", "name", "title", "source", "sourceName"]);
const DOMAIN: FieldChain = FieldChain(&["Domain", "domain"]);
const DATE: FieldChain = FieldChain(&["BreachDate", "date", "publishedAt"]);
const DATA_CLASSES: FieldChain = FieldChain(&["DataClasses", "dataClasses", "leaked"]);
const DESCRIPTION: FieldChain = FieldChain(&["Description", "description", "summary"]);
const RISK: FieldChain = FieldChain(&["riskScore", "risk"]);

const UNKNOWN_NAME: &str = "Unknown";

impl FieldChain {
    fn pick<'a>(&self, record: Option<&'a Map<String, Value>>) -> Option<&'a Value> {
        let record = record?;
        self.0
            .iter()
            .filter_map(|key| record.get(*key))
            .find(|value| is_truthy(value))
    }

    fn text(&self, record: Option<&Map<String, Value>>) -> Option<String> {
        self.pick(record).map(text)
    }
}

/// Decoded shape of one raw list element.
enum RawIncident<'a> {
    Label(&'a str),
    Record(&'a Map<String, Value>),
    Opaque,
}

impl<'a> RawIncident<'a> {
    fn decode(value: &'a Value) -> Self {
        match value {
            Value::String(label) => RawIncident::Label(label),
            Value::Object(record) => RawIncident::Record(record),
            _ => RawIncident::Opaque,
        }
    }
}

/// Converts a raw incident list into canonical incidents, preserving order.
/// Anything that is not a JSON array yields an empty list.
#[must_use]
pub fn normalize(raw: Option<&Value>) -> Vec<Incident> {
    let Some(Value::Array(items)) = raw else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| match RawIncident::decode(item) {
            RawIncident::Label(label) => Incident {
                id: format!("s-{index}"),
                name: label.to_string(),
                domain: None,
                date: None,
                data_classes: Vec::new(),
                description: None,
                risk: None,
                raw: item.clone(),
            },
            RawIncident::Record(record) => from_record(Some(record), index, item),
            RawIncident::Opaque => from_record(None, index, item),
        })
        .collect()
}

fn from_record(record: Option<&Map<String, Value>>, index: usize, raw: &Value) -> Incident {
    let name = NAME
        .text(record)
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());

    let data_classes = match DATA_CLASSES.pick(record) {
        Some(Value::Array(classes)) => classes.iter().map(text).collect(),
        _ => Vec::new(),
    };

    let id = record
        .and_then(|record| record.get("id"))
        .filter(|id| !id.is_null())
        .map_or_else(|| format!("{name}-{index}"), text);

    Incident {
        id,
        domain: DOMAIN.text(record),
        date: DATE.text(record),
        data_classes,
        description: DESCRIPTION.text(record),
        risk: RISK.pick(record).cloned(),
        raw: raw.clone(),
        name,
    }
}

/// JavaScript-style truthiness: `null`, `false`, `0` and `""` are falsy;
/// arrays and objects are truthy even when empty.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
