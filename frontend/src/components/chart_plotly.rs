use common::{GasId, GasReading};
use plotly::{
    common::{Line, Mode},
    layout::Margin,
    Configuration, Layout, Plot, Scatter,
};
use yew::prelude::*;

use crate::utils;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub id: String,
    pub readings: Vec<GasReading>,
}

/// One line per gas present in the readings.
#[function_component(ChartPlotly)]
pub fn chart_plotly(props: &Props) -> Html {
    let id = props.id.clone();
    let p = yew_hooks::use_async::<_, _, ()>({
        let mut plot = Plot::new();
        let timestamps: Vec<String> = props
            .readings
            .iter()
            .map(|r| r.timestamp.map_or_else(String::new, utils::chart_timestamp))
            .collect();

        for gas in GasId::ALL {
            let values: Vec<Option<f64>> = props.readings.iter().map(|r| r.get(gas)).collect();
            if values.iter().all(Option::is_none) {
                continue;
            }
            let trace = Scatter::new(timestamps.clone(), values)
                .name(gas.display_name())
                .mode(Mode::Lines)
                .line(Line::new().color(gas.color()));
            plot.add_trace(trace);
        }
        plot.set_configuration(
            Configuration::default()
                .display_logo(false)
                .editable(false)
                .display_mode_bar(plotly::configuration::DisplayModeBar::Hover),
        );
        plot.set_layout(
            Layout::default()
                .hover_mode(plotly::layout::HoverMode::XUnified)
                .auto_size(true)
                .margin(Margin::default().top(20).bottom(40).left(40).right(20)),
        );

        async move {
            plotly::bindings::new_plot(&id, &plot).await;
            Ok(())
        }
    });

    use_effect_with(
        // replot whenever the readings change
        props.readings.clone(),
        move |_| {
            p.run();
            || ()
        },
    );

    html! {
        <div class="chart" id={props.id.clone()}></div>
    }
}
