//! Column sorting.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use realtime::{Error, bad_request};
use serde::{Deserialize, Serialize};

use crate::position::Position;

/// Sortable record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Identificador,
    Tipo,
    Latitude,
    Longitude,
    Velocidade,
    Ignicao,
    Odometro,
    DataHora,
}

impl SortKey {
    /// Every key, in table column order.
    pub const ALL: [Self; 8] = [
        Self::Identificador,
        Self::Tipo,
        Self::Latitude,
        Self::Longitude,
        Self::Velocidade,
        Self::Ignicao,
        Self::Odometro,
        Self::DataHora,
    ];

    /// Field name as sent by the upstream.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identificador => "identificador",
            Self::Tipo => "tipo",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::Velocidade => "velocidade",
            Self::Ignicao => "ignicao",
            Self::Odometro => "odometro",
            Self::DataHora => "dataHora",
        }
    }

    /// Ascending comparison of two records on this key.
    #[must_use]
    pub fn compare(self, a: &Position, b: &Position) -> Ordering {
        match self {
            Self::Identificador => match (&a.identificador, &b.identificador) {
                (Some(a), Some(b)) => a.compare(b),
                (a, b) => a.is_some().cmp(&b.is_some()),
            },
            Self::Tipo => a.tipo.cmp(&b.tipo),
            Self::Latitude => numeric(a.latitude, b.latitude),
            Self::Longitude => numeric(a.longitude, b.longitude),
            Self::Velocidade => numeric(a.velocidade, b.velocidade),
            Self::Ignicao => a.ignicao.cmp(&b.ignicao),
            Self::Odometro => numeric(a.odometro, b.odometro),
            Self::DataHora => a.epoch_millis().cmp(&b.epoch_millis()),
        }
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| bad_request!("invalid sort key: {}", s))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// The opposite direction.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(bad_request!("invalid sort direction: {}", other)),
        }
    }
}

/// Active sort column and direction. No key means insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: Option<SortKey>,
    pub direction: Direction,
}

impl SortConfig {
    /// Sort by `key` in `direction`.
    #[must_use]
    pub const fn by(key: SortKey, direction: Direction) -> Self {
        Self { key: Some(key), direction }
    }

    /// Clicking the active column flips its direction; clicking another
    /// column sorts by it ascending.
    #[must_use]
    pub fn toggle(self, key: SortKey) -> Self {
        if self.key == Some(key) {
            return Self { key: Some(key), direction: self.direction.flip() };
        }
        Self::by(key, Direction::Asc)
    }

    /// Header indicator for `key`: `▲` or `▼` on the active column only.
    #[must_use]
    pub fn indicator(&self, key: SortKey) -> Option<&'static str> {
        if self.key != Some(key) {
            return None;
        }
        match self.direction {
            Direction::Asc => Some("▲"),
            Direction::Desc => Some("▼"),
        }
    }
}

/// Order `records` by `config`.
///
/// `sort_by` is stable, and descending order reverses the comparator rather
/// than the output, so records with equal keys keep their relative order in
/// both directions.
#[must_use]
pub fn sort<'a>(mut records: Vec<&'a Position>, config: &SortConfig) -> Vec<&'a Position> {
    let Some(key) = config.key else {
        return records;
    };
    records.sort_by(|a, b| config.direction.apply(key.compare(a, b)));
    records
}

// Absent values order first.
fn numeric(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::position::normalize;

    fn records(raw: Vec<Value>) -> Vec<Position> {
        raw.into_iter().map(|r| normalize(r).expect("should normalize")).collect()
    }

    fn ids(records: &[&Position]) -> Vec<String> {
        records.iter().filter_map(|r| r.identificador.as_ref()).map(ToString::to_string).collect()
    }

    #[test]
    fn by_date_ascending() {
        let records = records(vec![
            json!({"identificador": "b", "dataHora": "2024-01-02"}),
            json!({"identificador": "a", "dataHora": "2024-01-01"}),
        ]);

        let sorted = sort(records.iter().collect(), &SortConfig::by(SortKey::DataHora, Direction::Asc));
        let dates: Vec<_> = sorted.iter().filter_map(|r| r.data_hora.as_deref()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02"]);
    }

    #[test]
    fn unparseable_dates_sort_as_epoch() {
        let records = records(vec![
            json!({"identificador": 1, "dataHora": "1970-01-01T00:00:01Z"}),
            json!({"identificador": 2, "dataHora": "not a date"}),
            json!({"identificador": 3}),
        ]);

        let sorted = sort(records.iter().collect(), &SortConfig::by(SortKey::DataHora, Direction::Asc));
        assert_eq!(ids(&sorted), vec!["2", "3", "1"]);
    }

    #[test]
    fn ignition_false_first() {
        let records = records(vec![
            json!({"identificador": 1, "ignicao": "Sim"}),
            json!({"identificador": 2, "ignicao": false}),
        ]);

        let asc = sort(records.iter().collect(), &SortConfig::by(SortKey::Ignicao, Direction::Asc));
        assert_eq!(ids(&asc), vec!["2", "1"]);

        let desc = sort(records.iter().collect(), &SortConfig::by(SortKey::Ignicao, Direction::Desc));
        assert_eq!(ids(&desc), vec!["1", "2"]);
    }

    #[test]
    fn numeric_not_lexicographic() {
        let records = records(vec![
            json!({"identificador": 1, "velocidade": 100}),
            json!({"identificador": 2, "velocidade": 9}),
            json!({"identificador": 3}),
        ]);

        let sorted =
            sort(records.iter().collect(), &SortConfig::by(SortKey::Velocidade, Direction::Asc));
        assert_eq!(ids(&sorted), vec!["3", "2", "1"]);
    }

    #[test]
    fn non_finite_speeds_sort_as_absent() {
        let records = records(vec![
            json!({"identificador": 1, "velocidade": "NaN"}),
            json!({"identificador": 2, "velocidade": 30}),
            json!({"identificador": 3, "velocidade": "inf"}),
            json!({"identificador": 4, "velocidade": 10}),
            json!({"identificador": 5, "velocidade": 20}),
        ]);

        let asc =
            sort(records.iter().collect(), &SortConfig::by(SortKey::Velocidade, Direction::Asc));
        assert_eq!(ids(&asc), vec!["1", "3", "4", "5", "2"]);

        let desc =
            sort(records.iter().collect(), &SortConfig::by(SortKey::Velocidade, Direction::Desc));
        assert_eq!(ids(&desc), vec!["2", "5", "4", "1", "3"]);
    }

    #[test]
    fn stable_in_both_directions() {
        let records = records(vec![
            json!({"identificador": 1, "tipo": "carro"}),
            json!({"identificador": 2, "tipo": "moto"}),
            json!({"identificador": 3, "tipo": "carro"}),
            json!({"identificador": 4, "tipo": "moto"}),
            json!({"identificador": 5, "tipo": "carro"}),
        ]);

        let asc = sort(records.iter().collect(), &SortConfig::by(SortKey::Tipo, Direction::Asc));
        assert_eq!(ids(&asc), vec!["1", "3", "5", "2", "4"]);

        let desc = sort(records.iter().collect(), &SortConfig::by(SortKey::Tipo, Direction::Desc));
        assert_eq!(ids(&desc), vec!["2", "4", "1", "3", "5"]);
    }

    #[test]
    fn no_key_keeps_insertion_order() {
        let records = records(vec![
            json!({"identificador": 3}),
            json!({"identificador": 1}),
            json!({"identificador": 2}),
        ]);

        let sorted = sort(records.iter().collect(), &SortConfig::default());
        assert_eq!(ids(&sorted), vec!["3", "1", "2"]);
    }

    #[test]
    fn toggle_twice_returns_to_ascending() {
        let records = records(vec![
            json!({"identificador": 1, "velocidade": 20}),
            json!({"identificador": 2, "velocidade": 10}),
            json!({"identificador": 3, "velocidade": 20}),
        ]);

        let first = SortConfig::default().toggle(SortKey::Velocidade);
        assert_eq!(first, SortConfig::by(SortKey::Velocidade, Direction::Asc));

        let second = first.toggle(SortKey::Velocidade);
        assert_eq!(second.direction, Direction::Desc);

        let third = second.toggle(SortKey::Velocidade);
        assert_eq!(third, first);
        assert_eq!(
            ids(&sort(records.iter().collect(), &third)),
            ids(&sort(records.iter().collect(), &first))
        );
        assert_eq!(ids(&sort(records.iter().collect(), &third)), vec!["2", "1", "3"]);
    }

    #[test]
    fn new_key_starts_ascending() {
        let config = SortConfig::by(SortKey::Tipo, Direction::Desc).toggle(SortKey::Odometro);
        assert_eq!(config, SortConfig::by(SortKey::Odometro, Direction::Asc));
    }

    #[test]
    fn indicators() {
        let config = SortConfig::by(SortKey::Tipo, Direction::Desc);
        assert_eq!(config.indicator(SortKey::Tipo), Some("▼"));
        assert_eq!(config.indicator(SortKey::Velocidade), None);
        assert_eq!(SortConfig::default().indicator(SortKey::Tipo), None);
    }

    #[test]
    fn parse_keys() {
        assert_eq!("dataHora".parse::<SortKey>().expect("valid"), SortKey::DataHora);
        assert_eq!("DATAHORA".parse::<SortKey>().expect("valid"), SortKey::DataHora);
        assert_eq!("desc".parse::<Direction>().expect("valid"), Direction::Desc);
        assert!("speed".parse::<SortKey>().is_err());
        assert!("up".parse::<Direction>().is_err());
    }
}
