use dioxus::prelude::*;
use project_map_shared::geo::PixelPoint;

#[component]
pub fn PopupPanel(
    at: PixelPoint,
    container_class: String,
    close_icon_url: String,
    content: String,
    on_close: EventHandler<()>,
) -> Element {
    rsx! {
        div {
            class: "{container_class}",
            style: "left: {at.x}px; top: {at.y}px;",
            onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
            onclick: move |evt: Event<MouseData>| evt.stop_propagation(),
            img {
                class: "popup-close",
                src: "{close_icon_url}",
                alt: "Close",
                onclick: move |evt: Event<MouseData>| {
                    evt.stop_propagation();
                    on_close.call(());
                },
            }
            div { class: "popup-content", dangerous_inner_html: "{content}" }
        }
    }
}
