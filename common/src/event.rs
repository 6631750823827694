use serde::{de, Deserialize, Deserializer, Serialize};

use crate::{
    error::{Error, Result},
    gas::GasId,
    reading::GasReading,
};

/// Discriminator carried by alert events as `"type": "alert"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Alert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<GasId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>, // ppm
}

impl Alert {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Alert,
            message: message.into(),
            gas: None,
            value: None,
        }
    }

    pub fn for_gas(gas: GasId, value: f64) -> Self {
        Self {
            kind: AlertKind::Alert,
            message: format!("{} level is dangerous: {value} ppm", gas.display_name()),
            gas: Some(gas),
            value: Some(value),
        }
    }
}

/// One record of the live feed.
///
/// A regular update is a plain reading object, an alert carries
/// `"type": "alert"` and a human readable message. Any other `type` is
/// rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeedEvent {
    Reading(GasReading),
    Alert(Alert),
}

impl FeedEvent {
    pub fn parse(raw: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let kind = match value.get("type") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(kind)) => Some(kind.clone()),
            Some(other) => return Err(Error::UnsupportedEvent(other.to_string())),
        };

        match kind.as_deref() {
            None => Ok(FeedEvent::Reading(serde_json::from_value(value)?)),
            Some("alert") => Ok(FeedEvent::Alert(serde_json::from_value(value)?)),
            Some(other) => Err(Error::UnsupportedEvent(other.to_owned())),
        }
    }
}

impl<'de> Deserialize<'de> for FeedEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        FeedEvent::from_value(value).map_err(de::Error::custom)
    }
}

/// Response of the live feed endpoint. `next` is the cursor to send back as
/// `after` on the following request. `feed_id` changes whenever the backend
/// restarts, and sequence numbers start over with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    pub feed_id: u64,
    pub next: u64,
    pub events: Vec<FeedEvent>,
}

/// A client's position in the live feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedCursor {
    feed_id: Option<u64>,
    after: Option<u64>,
}

impl FeedCursor {
    /// Value for the `after` query parameter, `None` before the first page.
    pub fn after(&self) -> Option<u64> {
        self.after
    }

    /// Moves past `page` and returns whether its events should be handled.
    ///
    /// A page from another feed means the backend restarted: the page was cut
    /// with a stale cursor, so it is dropped and the cursor rewinds to the
    /// start of the new feed.
    pub fn advance(&mut self, page: &FeedPage) -> bool {
        let same_feed = self.feed_id.map_or(true, |id| id == page.feed_id);
        self.feed_id = Some(page.feed_id);
        self.after = Some(if same_feed { page.next } else { 0 });
        same_feed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_object_is_a_reading() {
        let event = FeedEvent::parse(r#"{"co": 20, "lpg": 150.5}"#).unwrap();
        let FeedEvent::Reading(reading) = event else {
            panic!("expected a reading");
        };
        assert_eq!(reading.co, Some(20.0));
        assert_eq!(reading.lpg, Some(150.5));
    }

    #[test]
    fn typed_alert() {
        let event = FeedEvent::parse(r#"{"type": "alert", "message": "Gas leak detected"}"#).unwrap();
        assert_eq!(event, FeedEvent::Alert(Alert::new("Gas leak detected")));
    }

    #[test]
    fn null_type_is_a_reading() {
        let event = FeedEvent::parse(r#"{"type": null, "smoke": 12}"#).unwrap();
        assert!(matches!(event, FeedEvent::Reading(r) if r.smoke == Some(12.0)));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = FeedEvent::parse(r#"{"type": "status", "uptime": 12}"#).unwrap_err();
        assert!(matches!(err, Error::UnsupportedEvent(_)));
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(matches!(
            FeedEvent::parse("{not json"),
            Err(Error::MalformedEvent(_))
        ));
        assert!(matches!(
            FeedEvent::parse(r#"{"co": "high"}"#),
            Err(Error::MalformedEvent(_))
        ));
        assert!(matches!(
            FeedEvent::parse(r#"{"type": "alert"}"#),
            Err(Error::MalformedEvent(_))
        ));
    }

    #[test]
    fn alert_serializes_with_discriminator() {
        let json = serde_json::to_value(FeedEvent::Alert(Alert::for_gas(GasId::Co, 45.0))).unwrap();
        assert_eq!(json["type"], "alert");
        assert_eq!(json["gas"], "co");
        assert_eq!(json["message"], "CO level is dangerous: 45 ppm");
    }

    #[test]
    fn page_round_trips_through_serde() {
        let page = FeedPage {
            feed_id: 1_714_557_600_000,
            next: 7,
            events: vec![
                FeedEvent::Reading(GasReading::default().with(GasId::Co2, 900.0)),
                FeedEvent::Alert(Alert::new("sensor restarted")),
            ],
        };
        let json = serde_json::to_string(&page).unwrap();
        let parsed: FeedPage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, page);
    }

    fn page(feed_id: u64, next: u64) -> FeedPage {
        FeedPage {
            feed_id,
            next,
            events: vec![FeedEvent::Alert(Alert::new("leak"))],
        }
    }

    #[test]
    fn cursor_follows_one_feed() {
        let mut cursor = FeedCursor::default();
        assert_eq!(cursor.after(), None);

        assert!(cursor.advance(&page(1, 3)));
        assert_eq!(cursor.after(), Some(3));
        assert!(cursor.advance(&page(1, 5)));
        assert_eq!(cursor.after(), Some(5));
    }

    #[test]
    fn cursor_rewinds_when_the_feed_restarts() {
        let mut cursor = FeedCursor::default();
        assert!(cursor.advance(&page(1, 5)));

        // new process already past the old cursor, events 1..=5 would be skipped
        assert!(!cursor.advance(&page(2, 9)));
        assert_eq!(cursor.after(), Some(0));

        assert!(cursor.advance(&page(2, 9)));
        assert_eq!(cursor.after(), Some(9));
    }
}
