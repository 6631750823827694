mod components;
mod request;
mod storage;
mod utils;

use common::Classifier;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Dashboard,
    #[at("/history")]
    History,
    #[not_found]
    #[at("/404")]
    NotFound,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub current_route: Route,
}

#[function_component(App)]
fn app() -> Html {
    // thresholds are fixed for the lifetime of the page
    html! {
        <ContextProvider<Classifier> context={Classifier::default()}>
            <BrowserRouter>
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ContextProvider<Classifier>>
    }
}

#[function_component(PageDashboard)]
pub fn page_dashboard() -> Html {
    html! {
        <div class="container-fluid">
            <div class="row">
                <Sidebar current_route={Route::Dashboard}/>
                <div class="col-sm-9 col-sm-offset-3 col-md-10 col-md-offset-2 main">
                    <h1 class="page-header">{"Live readings"}</h1>
                    <components::dashboard::Dashboard />
                </div>
            </div>
        </div>
    }
}

#[function_component(PageHistory)]
pub fn page_history() -> Html {
    html! {
        <div class="container-fluid">
            <div class="row">
                <Sidebar current_route={Route::History}/>
                <div class="col-sm-9 col-sm-offset-3 col-md-10 col-md-offset-2 main">
                    <h1 class="page-header">{"History"}</h1>
                    <components::history::History />
                </div>
            </div>
        </div>
    }
}

#[function_component(Sidebar)]
pub fn sidebar(props: &Props) -> Html {
    let cr = &props.current_route;
    let class_active = move |r| {
        if *cr == r {
            "active"
        } else {
            ""
        }
    };

    html! {
        <div class="col-sm-3 col-md-2 sidebar">
            <ul class="nav nav-sidebar">
                <li class={class_active(Route::Dashboard)}>
                    <Link<Route> to={Route::Dashboard}>{"⌂ Dashboard"}</Link<Route>>
                </li>
                <li class={class_active(Route::History)}>
                    <Link<Route> to={Route::History}>{"🗠 History"}</Link<Route>>
                </li>
            </ul>

            <ul class="nav nav-sidebar fix-bottom">
                {concat!("v", env!("CARGO_PKG_VERSION"))}
            </ul>
        </div>
    }
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Dashboard => html! { <PageDashboard/> },
        Route::History => html! { <PageHistory/> },
        Route::NotFound => html! { <h1>{ "404" }</h1> },
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
