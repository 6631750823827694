use common::{Classifier, GasReading};
use yew::prelude::*;

use crate::utils;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub reading: GasReading,
}

/// One reading with a status badge per gas it carries.
#[function_component(ReadingRow)]
pub fn reading_row(props: &Props) -> Html {
    let classifier = use_context::<Classifier>().unwrap_or_default();
    let time = props
        .reading
        .timestamp
        .map_or_else(|| "--".to_owned(), utils::format_timestamp);

    let rows: Html = classifier
        .assess(&props.reading)
        .map(|level| {
            html! {
                <div class="gas-reading-row">
                    <span class={classes!("gas-icon", level.gas.key())}></span>
                    <span class="gas-name">{level.gas.display_name()}</span>
                    <span class="gas-value">{format!("{} ppm", level.value)}</span>
                    <span class={classes!("status", level.tier.css_class())}>{level.tier.label()}</span>
                </div>
            }
        })
        .collect();

    html! {
        <div class="history-item">
            <div class="history-time">{time}</div>
            <div class="history-details">
                <div class="gas-readings-list">{rows}</div>
            </div>
        </div>
    }
}
