// request and response bodies of the backend API, keep in sync with api.rs of backend

use crate::{gas::GasId, reading::GasReading};

/// Body of `POST /api/data`, sent by the sensor board.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct IngestRequest {
    #[serde(flatten)]
    pub reading: GasReading,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct IngestResponse {
    pub status: String,
    pub received: GasReading,
    pub alerts: usize,
}

/// Body of `GET /api/history?date=YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct HistoryResponse {
    pub readings: Vec<GasReading>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Notification {
    pub id: i32,
    pub sensor_id: String,
    pub alert_type: String,
    pub gas: GasId,
    pub alert_value: f64, // ppm
    pub message: String,
    pub timestamp: i64, // ms since epoch
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SensorInfo {
    pub sensor_id: String, // unique, key
    pub last_seen: i64,    // ms since epoch
    pub ip_address: Option<String>,
    pub firmware_version: String,
}

/// Body of `GET /api/data`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DataResponse {
    pub gas_readings: Vec<GasReading>,
    pub notifications: Vec<Notification>,
    pub sensor_metadata: Vec<SensorInfo>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct DatabaseStats {
    pub gas_readings: i64,
    pub notifications: i64,
    pub sensor_metadata: i64,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database_stats: DatabaseStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_request_carries_reading_fields_inline() {
        let req: IngestRequest = serde_json::from_str(
            r#"{"sensor_id": "esp32-kitchen", "co": 12, "lpg": 300.5, "firmware_version": "1.2.0"}"#,
        )
        .unwrap();

        assert_eq!(req.sensor_id.as_deref(), Some("esp32-kitchen"));
        assert_eq!(req.firmware_version.as_deref(), Some("1.2.0"));
        assert_eq!(req.reading.co, Some(12.0));
        assert_eq!(req.reading.lpg, Some(300.5));
        assert_eq!(req.reading.smoke, None);
    }

    #[test]
    fn bare_reading_is_a_valid_ingest_request() {
        let req: IngestRequest = serde_json::from_str(r#"{"smoke": 5}"#).unwrap();
        assert_eq!(req.sensor_id, None);
        assert_eq!(req.reading.smoke, Some(5.0));
    }
}
