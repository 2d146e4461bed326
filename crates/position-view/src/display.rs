//! Display formatting for table rows.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::timestamp;

/// A record formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    /// Row key: `{identificador}-{dataHora}`.
    pub key: String,
    pub identificador: String,
    pub tipo: String,
    pub latitude: String,
    pub longitude: String,
    pub velocidade: String,
    pub ignicao: String,
    pub odometro: String,
    pub data_hora: String,
}

impl DisplayRow {
    /// Format `record`, rendering its timestamp in `zone`.
    #[must_use]
    pub fn new(record: &Position, zone: Tz) -> Self {
        Self {
            key: record.row_key(),
            identificador: record
                .identificador
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            tipo: record.tipo.clone(),
            latitude: verbatim(record.latitude),
            longitude: verbatim(record.longitude),
            velocidade: verbatim(record.velocidade),
            ignicao: if record.ignicao { "Sim" } else { "Não" }.to_string(),
            odometro: verbatim(record.odometro),
            data_hora: timestamp::format_local(record.data_hora.as_deref(), zone),
        }
    }
}

fn verbatim(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono_tz::America::Sao_Paulo;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::position::normalize;

    #[test]
    fn formats_row() {
        let record = normalize(json!({
            "identificador": 9051,
            "tipo": "carro",
            "latitude": -23.5505,
            "longitude": -46.6333,
            "velocidade": 42,
            "ignicao": "S",
            "odometro": 120_345.5,
            "dataHora": "2024-03-10T15:30:00Z"
        }))
        .expect("should normalize");

        assert_eq!(
            DisplayRow::new(&record, Sao_Paulo),
            DisplayRow {
                key: "9051-2024-03-10T15:30:00Z".to_string(),
                identificador: "9051".to_string(),
                tipo: "CARRO".to_string(),
                latitude: "-23.5505".to_string(),
                longitude: "-46.6333".to_string(),
                velocidade: "42".to_string(),
                ignicao: "Sim".to_string(),
                odometro: "120345.5".to_string(),
                data_hora: "10/03/2024, 12:30:00".to_string(),
            }
        );
    }

    #[test]
    fn missing_values() {
        let record = normalize(json!({"identificador": "X1"})).expect("should normalize");
        let row = DisplayRow::new(&record, Sao_Paulo);

        assert_eq!(row.key, "X1-");
        assert_eq!(row.velocidade, "");
        assert_eq!(row.ignicao, "Não");
        assert_eq!(row.data_hora, timestamp::INVALID_DATE);
    }
}
