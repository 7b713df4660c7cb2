use std::rc::Rc;

use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::logger::tracing;
use dioxus::prelude::*;
use project_map_shared::geo::tile_url;
use project_map_shared::models::SiteConfig;
use project_map_shared::widget::{MapEvent, MapWidget};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::components::marker_view::ProjectMarker;
use crate::components::popup_panel::PopupPanel;
use crate::coords;

pub const MAP_CONTAINER_ID: &str = "project-map";

/// Drag threshold in pixels; movement below this is treated as a click.
const DRAG_THRESHOLD: f64 = 3.0;

/// Touch drag threshold, larger than mouse because touch is less precise.
const TOUCH_DRAG_THRESHOLD: f64 = 8.0;

/// Wheel travel needed for one zoom step when the scroll wheel is enabled.
const WHEEL_STEP: f64 = 100.0;

/// Used under the tiles when the style table has no water color.
const FALLBACK_BACKGROUND: &str = "#c9d6df";

fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Measure the container and lay every marker out again.
fn remeasure(widget: &mut Signal<MapWidget>) {
    let id = widget.peek().container_id().to_string();
    match coords::container_size(&id) {
        Some((w, h)) => {
            let mut map = widget.write();
            map.resize(w, h);
            map.draw_all();
        }
        None => tracing::warn!(container = %id, "Map container not found"),
    }
}

/// Apply a viewport change and redraw if it did anything.
fn update_view(widget: &mut Signal<MapWidget>, f: impl FnOnce(&mut MapWidget) -> bool) {
    let mut map = widget.write();
    if f(&mut *map) {
        map.draw_all();
    }
}

#[component]
pub fn MapView(initial: MapWidget, site: SiteConfig, focus: Option<String>) -> Element {
    let mut widget = use_signal(move || initial);

    // Mouse pan state
    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut drag_start = use_signal(|| (0.0_f64, 0.0_f64));
    let mut last_pos = use_signal(|| (0.0_f64, 0.0_f64));

    // Touch pan state
    let mut touch_start = use_signal(|| None::<(f64, f64)>);
    let mut touch_did_pan = use_signal(|| false);
    let mut touch_last = use_signal(|| (0.0_f64, 0.0_f64));

    let mut wheel_accum = use_signal(|| 0.0_f64);

    // One window resize listener for the lifetime of the view
    let resize_listener = use_hook(move || {
        let listener = Closure::<dyn FnMut()>::new(move || remeasure(&mut widget));
        if let Some(window) = web_sys::window() {
            if let Err(e) =
                window.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
            {
                tracing::warn!(error = ?e, "Failed to register resize listener");
            }
        }
        Rc::new(listener)
    });
    use_drop(move || {
        let listener: &Closure<dyn FnMut()> = &resize_listener;
        if let Some(window) = web_sys::window() {
            let _ = window
                .remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref());
        }
    });

    // Follow the routed country, including route changes that keep this view mounted
    use_effect(use_reactive!(|(focus,)| {
        if let Some(key) = focus.as_deref() {
            if widget.peek().find_marker(key).is_none() {
                tracing::warn!(%key, "No marker for country");
            }
        }
        widget.write().focus(focus.as_deref());
    }));

    let map = widget.read();
    let container_id = map.container_id().to_string();
    let viewport = *map.viewport();
    let tile_filter = map.tile_filter().to_string();
    let background = map.water_color().unwrap_or(FALLBACK_BACKGROUND).to_string();
    let scroll_wheel = map.scroll_wheel_enabled();
    let markers: Vec<_> = map
        .markers()
        .iter()
        .filter_map(|m| m.element().map(|el| (m.id(), el.clone())))
        .collect();
    let popup = map.popup_position().map(|at| {
        let p = map.popup();
        (at, p.container_class.clone(), p.close_icon_url.clone(), p.content().to_string())
    });
    drop(map);

    let tiles = viewport.visible_tiles();
    let dragging = *is_dragging.read() && *did_drag.read();
    let container_class = if dragging { "project-map dragging" } else { "project-map" };

    rsx! {
        div {
            id: "{container_id}",
            class: container_class,
            style: "background: {background};",
            tabindex: "0",
            onmounted: move |_| remeasure(&mut widget),
            onwheel: move |evt: Event<WheelData>| {
                if !scroll_wheel {
                    return;
                }
                evt.prevent_default();
                let total = *wheel_accum.read() + wheel_delta_y(evt.data().delta());
                if total.abs() < WHEEL_STEP {
                    wheel_accum.set(total);
                    return;
                }
                wheel_accum.set(0.0);
                if total < 0.0 {
                    update_view(&mut widget, MapWidget::zoom_in);
                } else {
                    update_view(&mut widget, MapWidget::zoom_out);
                }
            },
            onmousedown: move |evt: Event<MouseData>| {
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                is_dragging.set(true);
                did_drag.set(false);
                drag_start.set((client.x, client.y));
                last_pos.set((client.x, client.y));
            },
            onmousemove: move |evt: Event<MouseData>| {
                if !*is_dragging.read() {
                    return;
                }
                let client = evt.client_coordinates();
                let current = (client.x, client.y);
                if !*did_drag.read() && coords::exceeds_threshold(*drag_start.read(), current, DRAG_THRESHOLD) {
                    did_drag.set(true);
                }
                if *did_drag.read() {
                    let (lx, ly) = *last_pos.read();
                    update_view(&mut widget, |m| {
                        m.pan_by(current.0 - lx, current.1 - ly);
                        true
                    });
                    last_pos.set(current);
                }
            },
            onmouseup: move |_| {
                is_dragging.set(false);
            },
            onmouseleave: move |_| {
                is_dragging.set(false);
            },
            ontouchstart: move |evt: Event<TouchData>| {
                let touches = evt.data().touches();
                if let [t] = touches.as_slice() {
                    let p = (t.client_coordinates().x, t.client_coordinates().y);
                    touch_start.set(Some(p));
                    touch_last.set(p);
                    touch_did_pan.set(false);
                } else {
                    touch_start.set(None);
                }
            },
            ontouchmove: move |evt: Event<TouchData>| {
                let Some(start) = *touch_start.read() else {
                    return;
                };
                let touches = evt.data().touches();
                let Some(t) = touches.first() else {
                    return;
                };
                let current = (t.client_coordinates().x, t.client_coordinates().y);
                if !*touch_did_pan.read() && coords::exceeds_threshold(start, current, TOUCH_DRAG_THRESHOLD) {
                    touch_did_pan.set(true);
                }
                if *touch_did_pan.read() {
                    evt.prevent_default();
                    let (lx, ly) = *touch_last.read();
                    update_view(&mut widget, |m| {
                        m.pan_by(current.0 - lx, current.1 - ly);
                        true
                    });
                    touch_last.set(current);
                }
            },
            ontouchend: move |_| {
                touch_start.set(None);
            },
            onkeydown: move |evt: Event<KeyboardData>| match evt.key() {
                Key::Escape => {
                    widget.write().handle_event(MapEvent::PopupClosed);
                }
                Key::Character(c) if c == "+" || c == "=" => {
                    update_view(&mut widget, MapWidget::zoom_in);
                }
                Key::Character(c) if c == "-" => {
                    update_view(&mut widget, MapWidget::zoom_out);
                }
                Key::Character(c) if c == "0" => {
                    update_view(&mut widget, |m| {
                        m.reset_view();
                        true
                    });
                }
                _ => {}
            },

            div { class: "tile-layer", style: "filter: {tile_filter};",
                for t in tiles {
                    img {
                        key: "{t.z}/{t.col}/{t.y}",
                        class: "map-tile",
                        src: tile_url(&site.tile_url, t.z, t.x, t.y),
                        style: "left: {t.left}px; top: {t.top}px;",
                        draggable: "false",
                        alt: "",
                    }
                }
            }

            div { class: "marker-layer",
                for (id, element) in markers {
                    ProjectMarker {
                        key: "{id}",
                        element,
                        on_select: move |_| {
                            let mut map = widget.write();
                            let event = map.markers().get(id).and_then(|m| m.click());
                            if let Some(event) = event {
                                map.handle_event(event);
                            }
                        },
                    }
                }
            }

            if let Some((at, container_class, close_icon_url, content)) = popup {
                PopupPanel {
                    at,
                    container_class,
                    close_icon_url,
                    content,
                    on_close: move |_| {
                        widget.write().handle_event(MapEvent::PopupClosed);
                    },
                }
            }

            div { class: "zoom-controls",
                onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                button {
                    title: "Zoom in",
                    onclick: move |_| update_view(&mut widget, MapWidget::zoom_in),
                    "+"
                }
                button {
                    title: "Zoom out",
                    onclick: move |_| update_view(&mut widget, MapWidget::zoom_out),
                    "\u{2212}"
                }
            }

            div { class: "map-attribution", "{site.tile_attribution}" }
        }
    }
}
