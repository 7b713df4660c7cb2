use dioxus::prelude::*;
use project_map_shared::marker::MarkerElement;

/// One project marker. The expanded label is revealed by CSS on hover or
/// while the marker carries the `active` class.
#[component]
pub fn ProjectMarker(element: MarkerElement, on_select: EventHandler<()>) -> Element {
    let class = element.class_name();
    let style = element.style();

    rsx! {
        div {
            id: element.id.clone(),
            class: "{class}",
            style: "{style}",
            role: "button",
            title: "{element.expanded_label}",
            // Keep the map from starting a pan under the marker
            onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
            onclick: move |evt: Event<MouseData>| {
                evt.stop_propagation();
                on_select.call(());
            },
            span { class: "marker-count", "{element.collapsed_label}" }
            span { class: "marker-country", "{element.expanded_label}" }
        }
    }
}
