use std::{cell::Cell, collections::BTreeMap, rc::Rc, time::Duration};

use common::{
    Alert, Classifier, FeedCursor, GasId, GasLevel, GasReading, HistoryStore, Monitor, Presenter,
};
use log::{info, warn};
use yew::prelude::*;
use yew_hooks::use_interval;

use crate::{components::reading_row::ReadingRow, request, storage::LocalStorage, utils};

/// How long an alert stays on screen, in ms.
const ALERT_TTL: f64 = 5_000.0;
const RETRY_DELAY: Duration = Duration::from_secs(3);

/// What the dashboard currently shows, filled in by the monitor.
#[derive(Debug, Default)]
struct DashboardView {
    levels: BTreeMap<GasId, GasLevel>,
    alerts: Vec<(f64, Alert)>,
    history: Vec<GasReading>,
}

impl DashboardView {
    /// Drops alerts older than [`ALERT_TTL`]. Returns whether any were dropped.
    fn expire_alerts(&mut self, now: f64) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|(shown_at, _)| now - shown_at < ALERT_TTL);
        self.alerts.len() != before
    }
}

impl Presenter for DashboardView {
    fn show_level(&mut self, level: &GasLevel) {
        self.levels.insert(level.gas, *level);
    }

    fn show_alert(&mut self, alert: &Alert) {
        self.alerts.push((utils::now_millis(), alert.clone()));
    }

    fn show_history(&mut self, history: &[GasReading]) {
        self.history = history.to_vec();
    }
}

fn gauge(gas: GasId, level: Option<&GasLevel>) -> Html {
    let percentage = level.map_or(0.0, |l| l.percentage);
    let style = format!(
        "background: conic-gradient(var(--secondary) {percentage}%, var(--dark) 0%)"
    );
    let reading = level.map_or_else(|| "-- ppm".to_owned(), |l| format!("{} ppm", l.value));
    let status_class = level.map(|l| l.tier.css_class());
    let status = level.map_or("Waiting", |l| l.tier.label());

    html! {
        <div class="gas-card">
            <h3>{gas.display_name()}</h3>
            <div class="gauge" id={format!("{}-gauge", gas.key())} style={style}></div>
            <div class="reading" id={format!("{}-reading", gas.key())}>{reading}</div>
            <div class={classes!("status", status_class)} id={format!("{}-status", gas.key())}>
                {status}
            </div>
        </div>
    }
}

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let classifier = use_context::<Classifier>().unwrap_or_default();
    let monitor = use_mut_ref(move || {
        Monitor::new(classifier, HistoryStore::new(LocalStorage))
    });
    let view = {
        let monitor = monitor.clone();
        use_mut_ref(move || DashboardView {
            history: monitor.borrow().history().load_all(),
            ..DashboardView::default()
        })
    };
    let trigger = use_force_update();

    // live feed, one page at a time so events are handled in arrival order
    {
        let monitor = monitor.clone();
        let view = view.clone();
        let trigger = trigger.clone();
        use_effect_with((), move |_| {
            let alive = Rc::new(Cell::new(true));
            {
                let alive = alive.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    info!("Subscribing to live feed");
                    let mut cursor = FeedCursor::default();
                    while alive.get() {
                        match request::feed(cursor.after()).await {
                            Ok(page) => {
                                if !cursor.advance(&page) {
                                    info!("Backend restarted, replaying its feed");
                                    continue;
                                }
                                if !alive.get() || page.events.is_empty() {
                                    continue;
                                }
                                {
                                    let mut view = view.borrow_mut();
                                    let mut monitor = monitor.borrow_mut();
                                    for event in page.events {
                                        monitor.handle(event, &mut *view);
                                    }
                                }
                                trigger.force_update();
                            }
                            Err(e) => {
                                warn!("Live feed request failed: {e}");
                                yew::platform::time::sleep(RETRY_DELAY).await;
                            }
                        }
                    }
                });
            }
            move || alive.set(false)
        });
    }

    {
        let view = view.clone();
        let trigger = trigger.clone();
        use_interval(
            move || {
                let expired = view.borrow_mut().expire_alerts(utils::now_millis());
                if expired {
                    trigger.force_update();
                }
            },
            1000,
        );
    }

    let view = view.borrow();
    let gauges: Html = GasId::ALL
        .into_iter()
        .map(|gas| gauge(gas, view.levels.get(&gas)))
        .collect();
    let alerts: Html = view
        .alerts
        .iter()
        .map(|(_, alert)| {
            html! {
                <div class="gas-alert">
                    <i class="fas fa-exclamation-triangle"></i>
                    <span>{alert.message.clone()}</span>
                </div>
            }
        })
        .collect();
    let history: Html = view
        .history
        .iter()
        .rev()
        .map(|reading| html! { <ReadingRow reading={reading.clone()} /> })
        .collect();

    html! {
        <>
            <div class="alerts">{alerts}</div>
            <div class="gas-grid">{gauges}</div>
            <h2 class="sub-header">{"Recent readings"}</h2>
            if view.history.is_empty() {
                <div class="history-empty">{"No readings yet"}</div>
            } else {
                <div class="history-items">{history}</div>
            }
        </>
    }
}
