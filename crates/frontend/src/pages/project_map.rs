use dioxus::logger::tracing;
use dioxus::prelude::*;
use project_map_shared::widget::{MapOptions, MapWidget};

use crate::api;
use crate::components::map_view::{MapView, MAP_CONTAINER_ID};

#[component]
pub fn ProjectMap(focus: Option<String>) -> Element {
    let data = use_resource(|| async move {
        let site = api::fetch_site_config().await?;
        let records = api::fetch_projects().await?;
        tracing::info!(countries = records.len(), "Loaded project records");
        Ok::<_, String>((site, records))
    });

    let body = match &*data.read() {
        None => rsx! {
            div { class: "map-status", "Loading projects..." }
        },
        Some(Err(e)) => {
            tracing::error!(error = %e, "Failed to load projects");
            rsx! {
                div { class: "map-status error", "Could not load projects: {e}" }
            }
        }
        Some(Ok((site, records))) => {
            match MapWidget::from_records(MAP_CONTAINER_ID, MapOptions::default(), site, records) {
                Ok(widget) => rsx! {
                    MapView { initial: widget, site: site.clone(), focus: focus.clone() }
                },
                Err(e) => {
                    tracing::error!(error = %e, "Invalid project records");
                    rsx! {
                        div { class: "map-status error", "{e}" }
                    }
                }
            }
        }
    };

    rsx! {
        div { class: "app",
            header { class: "app-header",
                h1 { "Where we work" }
            }
            main { class: "map-wrapper", {body} }
        }
    }
}
