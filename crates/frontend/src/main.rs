mod api;
mod components;
mod coords;
mod pages;

use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
    #[route("/country/:country_key")]
    Country { country_key: String },
}

#[component]
fn Home() -> Element {
    rsx! {
        pages::project_map::ProjectMap { focus: None::<String> }
    }
}

/// Same map, opened on one country's popup.
#[component]
fn Country(country_key: String) -> Element {
    rsx! {
        pages::project_map::ProjectMap { focus: Some(country_key) }
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    dioxus::logger::init(dioxus::logger::tracing::Level::INFO).ok();
    launch(App);
}
