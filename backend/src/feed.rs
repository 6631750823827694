use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use common::{FeedEvent, FeedPage};
use log::debug;
use tokio::sync::Notify;

use crate::utils;

/// Events kept for clients that fall behind.
pub const FEED_CAPACITY: usize = 256;
/// Upper bound of a long-poll wait.
pub const MAX_WAIT: Duration = Duration::from_secs(30);

#[derive(Debug, Default)]
struct Inner {
    last_seq: u64,
    events: VecDeque<(u64, FeedEvent)>,
}

/// In-memory live feed. Every published event gets the next sequence number;
/// readers pass the last number they saw and get everything after it.
/// Sequence numbers restart with the process, so each feed carries an id
/// taken from its start time.
#[derive(Debug)]
pub struct Feed {
    id: u64,
    inner: Mutex<Inner>,
    notify: Notify,
}

impl Feed {
    pub fn new() -> Self {
        Self::with_id(utils::ms_since_epoch().unsigned_abs())
    }

    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            inner: Mutex::default(),
            notify: Notify::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn publish(&self, event: FeedEvent) -> u64 {
        let seq = {
            let mut inner = self.lock();
            inner.last_seq += 1;
            let seq = inner.last_seq;
            inner.events.push_back((seq, event));
            if inner.events.len() > FEED_CAPACITY {
                inner.events.pop_front();
            }
            seq
        };
        self.notify.notify_waiters();

        seq
    }

    /// Events after `after`. Without a cursor the page is empty and only
    /// tells the client where the feed currently ends.
    pub fn page(&self, after: Option<u64>) -> FeedPage {
        let inner = self.lock();
        let Some(mut after) = after else {
            return FeedPage {
                feed_id: self.id,
                next: inner.last_seq,
                events: Vec::new(),
            };
        };

        // cursor from before a restart
        if after > inner.last_seq {
            debug!("feed cursor {after} is ahead of {}, rewinding", inner.last_seq);
            after = 0;
        }

        FeedPage {
            feed_id: self.id,
            next: inner.last_seq,
            events: inner
                .events
                .iter()
                .filter(|(seq, _)| *seq > after)
                .map(|(_, event)| event.clone())
                .collect(),
        }
    }

    /// Like [`Feed::page`], but waits up to `wait` (capped at [`MAX_WAIT`])
    /// for an event when nothing is pending.
    pub async fn wait_page(&self, after: Option<u64>, wait: Duration) -> FeedPage {
        // register before looking so a publish in between still wakes us
        let notified = self.notify.notified();
        let page = self.page(after);
        if after.is_none() || !page.events.is_empty() || wait.is_zero() {
            return page;
        }

        if tokio::time::timeout(wait.min(MAX_WAIT), notified)
            .await
            .is_err()
        {
            return page;
        }
        self.page(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Alert, GasId, GasReading};
    use std::sync::Arc;

    fn reading(co: f64) -> FeedEvent {
        FeedEvent::Reading(GasReading::default().with(GasId::Co, co))
    }

    #[test]
    fn events_after_cursor_in_order() {
        let feed = Feed::new();
        assert_eq!(feed.publish(reading(1.0)), 1);
        assert_eq!(feed.publish(FeedEvent::Alert(Alert::new("leak"))), 2);
        assert_eq!(feed.publish(reading(3.0)), 3);

        let page = feed.page(Some(1));
        assert_eq!(page.next, 3);
        assert_eq!(
            page.events,
            vec![FeedEvent::Alert(Alert::new("leak")), reading(3.0)]
        );
        assert!(feed.page(Some(3)).events.is_empty());
    }

    #[test]
    fn no_cursor_starts_at_the_tail() {
        let feed = Feed::new();
        feed.publish(reading(1.0));
        feed.publish(reading(2.0));

        let page = feed.page(None);
        assert_eq!(page.next, 2);
        assert!(page.events.is_empty());
    }

    #[test]
    fn old_events_are_evicted() {
        let feed = Feed::new();
        for n in 0..(FEED_CAPACITY + 10) {
            feed.publish(reading(n as f64));
        }

        let page = feed.page(Some(0));
        assert_eq!(page.events.len(), FEED_CAPACITY);
        assert_eq!(page.events[0], reading(10.0));
        assert_eq!(page.next, (FEED_CAPACITY + 10) as u64);
    }

    #[test]
    fn pages_carry_the_feed_id() {
        let feed = Feed::with_id(42);
        feed.publish(reading(1.0));
        assert_eq!(feed.page(None).feed_id, 42);
        assert_eq!(feed.page(Some(0)).feed_id, 42);
        assert_ne!(Feed::new().id(), 0);
    }

    #[test]
    fn cursor_ahead_of_feed_rewinds() {
        let feed = Feed::new();
        feed.publish(reading(1.0));

        let page = feed.page(Some(40));
        assert_eq!(page.next, 1);
        assert_eq!(page.events, vec![reading(1.0)]);
    }

    #[tokio::test]
    async fn long_poll_wakes_on_publish() {
        let feed = Arc::new(Feed::new());
        let publisher = feed.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            publisher.publish(reading(7.0));
        });

        let page = feed.wait_page(Some(0), Duration::from_secs(5)).await;
        assert_eq!(page.events, vec![reading(7.0)]);
        assert_eq!(page.next, 1);
    }

    #[tokio::test]
    async fn long_poll_times_out_empty() {
        let feed = Feed::new();
        let page = feed.wait_page(Some(0), Duration::from_millis(20)).await;
        assert!(page.events.is_empty());
        assert_eq!(page.next, 0);
    }
}
