use std::{cell::Cell, rc::Rc};

use chrono::NaiveDate;
use common::GasReading;
use log::warn;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::{
    components::{chart_plotly::ChartPlotly, reading_row::ReadingRow},
    request, utils,
};

/// Report of all readings the backend stored on one day.
#[function_component(History)]
pub fn history() -> Html {
    let date = use_state_eq(utils::today);
    let readings = use_state(|| None::<Result<Vec<GasReading>, String>>);

    {
        let readings = readings.clone();
        use_effect_with(*date, move |date| {
            let date = *date;
            // cleared when another date is picked, a late response is dropped
            let current = Rc::new(Cell::new(true));
            readings.set(None);
            {
                let current = current.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let resp = request::history(date).await.map(|r| r.readings);
                    if !current.get() {
                        return;
                    }
                    if let Err(e) = &resp {
                        warn!("Cannot load history of {date}: {e}");
                    }
                    readings.set(Some(resp.map_err(|e| e.to_string())));
                });
            }
            move || current.set(false)
        });
    }

    let on_date_changed = {
        let date = date.clone();
        Callback::from(move |e: Event| {
            let input = e
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok());
            if let Some(day) =
                input.and_then(|i| NaiveDate::parse_from_str(&i.value(), "%Y-%m-%d").ok())
            {
                date.set(day);
            }
        })
    };

    let content = match readings.as_ref() {
        None => html! { <div>{"Loading..."}</div> },
        Some(Err(e)) => html! {
            <div class="alert alert-danger">{format!("Cannot load history: {e}")}</div>
        },
        Some(Ok(readings)) if readings.is_empty() => html! {
            <div class="history-empty">{"No readings on this day"}</div>
        },
        Some(Ok(readings)) => html! {
            <>
                <div class="panel panel-default">
                    <div class="panel-body">
                        <ChartPlotly id="historyChart" readings={readings.clone()} />
                    </div>
                </div>
                <div class="history-items">
                    { for readings.iter().map(|reading| html! { <ReadingRow reading={reading.clone()} /> }) }
                </div>
            </>
        },
    };

    html! {
        <>
            <div class="input-group col-md-4">
                <span class="input-group-addon">{"Date"}</span>
                <input type="date" id="historyDate" class="form-control"
                    value={date.format("%Y-%m-%d").to_string()}
                    onchange={on_date_changed}
                />
            </div>
            {content}
        </>
    }
}
