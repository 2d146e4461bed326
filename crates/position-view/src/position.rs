//! Position records and their normalization.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// One telemetry reading for a tracked vehicle.
///
/// Deserializing a `Position` normalizes it: `tipo` is trimmed and
/// upper-cased and `ignicao` is coerced to a boolean. Numeric fields accept
/// numbers, numeric strings or null. Fields this type does not name are kept
/// in `extra` so nothing the upstream sent is lost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identificador: Option<Identifier>,

    #[serde(default, deserialize_with = "vehicle_type")]
    pub tipo: String,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub velocidade: Option<f64>,

    #[serde(default, deserialize_with = "ignition")]
    pub ignicao: bool,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub odometro: Option<f64>,

    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub data_hora: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Position {
    /// Speed used for aggregates: absent counts as 0.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.velocidade.unwrap_or_default()
    }

    /// Timestamp in epoch milliseconds, 0 when absent or unparseable.
    #[must_use]
    pub fn epoch_millis(&self) -> i64 {
        self.data_hora.as_deref().and_then(crate::timestamp::epoch_millis).unwrap_or_default()
    }

    /// Key identifying the record in a rendered table.
    #[must_use]
    pub fn row_key(&self) -> String {
        let id = self.identificador.as_ref().map(ToString::to_string).unwrap_or_default();
        let when = self.data_hora.as_deref().unwrap_or_default();
        format!("{id}-{when}")
    }
}

/// Normalize one raw upstream record.
///
/// # Errors
///
/// Returns an error when `raw` is not a JSON object or a named field has a
/// type that cannot be coerced (for example an object as `identificador`).
pub fn normalize(raw: Value) -> serde_json::Result<Position> {
    serde_json::from_value(raw)
}

/// Normalize a raw upstream array into a fresh record collection.
///
/// # Errors
///
/// Returns an error when `raw` is not an array or any record fails to
/// normalize.
pub fn normalize_all(raw: Value) -> serde_json::Result<Vec<Position>> {
    serde_json::from_value(raw)
}

/// Opaque vehicle identifier, sent by the upstream as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(Number),
    Text(String),
}

impl Identifier {
    /// Numbers order before text; numbers compare numerically and text
    /// lexicographically.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => compare_numbers(a, b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

// Integers compare exactly; floats only when either side is one.
fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a.cmp(&b);
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a.cmp(&b);
    }
    // a negative integer against one above i64::MAX
    if a.is_i64() && b.is_u64() {
        return Ordering::Less;
    }
    if a.is_u64() && b.is_i64() {
        return Ordering::Greater;
    }
    let (a, b) = (a.as_f64().unwrap_or_default(), b.as_f64().unwrap_or_default());
    a.total_cmp(&b)
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// `true` for boolean `true` or any string starting with `S`/`s`
/// (`"Sim"`, `"S"`, `"SIM"`), `false` for everything else.
#[must_use]
pub fn ignition_on(value: &Value) -> bool {
    match value {
        Value::Bool(on) => *on,
        Value::String(s) => s.to_uppercase().starts_with('S'),
        _ => false,
    }
}

/// Trimmed, upper-cased vehicle category.
#[must_use]
pub fn normalize_type(tipo: &str) -> String {
    tipo.trim().to_uppercase()
}

fn vehicle_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let tipo = Option::<String>::deserialize(deserializer)?;
    Ok(tipo.as_deref().map(normalize_type).unwrap_or_default())
}

fn ignition<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(ignition_on(&value))
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    // "NaN" and "inf" parse as f64 but are not readings
    Ok(number.filter(|n: &f64| n.is_finite()))
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let text = match value {
        Value::String(s) => Some(s),
        _ => None,
    };
    Ok(text)
}
