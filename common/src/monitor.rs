use log::{debug, warn};

use crate::{
    classify::{Classifier, GasLevel},
    error::Result,
    event::{Alert, FeedEvent},
    history::{HistoryStore, StorageBackend},
    reading::GasReading,
};

/// Rendering side of the dashboard. The monitor hands it classified levels
/// and alerts and never looks at the UI itself.
pub trait Presenter {
    fn show_level(&mut self, level: &GasLevel);
    fn show_alert(&mut self, alert: &Alert);
    fn show_history(&mut self, _history: &[GasReading]) {}
}

/// Drives one dashboard from the live feed: classify, present, then record
/// the reading in the rolling history. Events are handled one at a time in
/// the order they are passed in.
#[derive(Debug)]
pub struct Monitor<B> {
    classifier: Classifier,
    history: HistoryStore<B>,
}

impl<B: StorageBackend> Monitor<B> {
    pub fn new(classifier: Classifier, history: HistoryStore<B>) -> Self {
        Self {
            classifier,
            history,
        }
    }

    pub fn history(&self) -> &HistoryStore<B> {
        &self.history
    }

    pub fn handle(&mut self, event: FeedEvent, presenter: &mut impl Presenter) {
        match event {
            FeedEvent::Reading(reading) => {
                for level in self.classifier.assess(&reading) {
                    presenter.show_level(&level);
                }
                self.history.append(reading);
                presenter.show_history(&self.history.load_all());
            }
            FeedEvent::Alert(alert) => {
                debug!("alert: {}", alert.message);
                presenter.show_alert(&alert);
            }
        }
    }

    /// Parses a raw feed record and handles it. Records that cannot be parsed
    /// are dropped and the error is returned.
    pub fn handle_json(&mut self, raw: &str, presenter: &mut impl Presenter) -> Result<()> {
        match FeedEvent::parse(raw) {
            Ok(event) => {
                self.handle(event, presenter);
                Ok(())
            }
            Err(e) => {
                warn!("dropping feed record: {e}");
                Err(e)
            }
        }
    }
}
