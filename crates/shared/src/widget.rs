use crate::error::MapError;
use crate::geo::{LatLng, PixelPoint, Viewport};
use crate::marker::{MarkerArgs, MarkerId, MarkerOverlay, Overlay};
use crate::models::{validate_records, ProjectRecords, SiteConfig};
use crate::popup::Popup;
use crate::style::{self, StyleRule};

pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 20.0,
    lng: 10.0,
};
pub const DEFAULT_ZOOM: u8 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub center: LatLng,
    pub zoom: u8,
    /// Whether the mouse wheel zooms the map. Off for the project map.
    pub scroll_wheel: bool,
    pub styles: Vec<StyleRule>,
}

impl Default for MapOptions {
    fn default() -> Self {
        MapOptions {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            scroll_wheel: false,
            styles: style::default_styles(),
        }
    }
}

/// DOM id given to the marker built from the record with `key`.
pub fn marker_dom_id(key: &str) -> String {
    format!("project-marker-{}", key)
}

/// User interactions the widget reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEvent {
    MarkerClicked(MarkerId),
    /// The popup's close icon was clicked.
    PopupClosed,
}

/// A styled map with one marker per project record and a single shared popup.
#[derive(Debug, Clone, PartialEq)]
pub struct MapWidget {
    container_id: String,
    options: MapOptions,
    viewport: Viewport,
    markers: Vec<MarkerOverlay>,
    popup: Popup,
    tile_filter: String,
}

impl MapWidget {
    /// Build an empty map for the container `container_id`.
    ///
    /// The viewport has no size until [`MapWidget::resize`] is called with the
    /// container's measured dimensions.
    pub fn new(container_id: &str, options: MapOptions, site: &SiteConfig) -> Result<Self, MapError> {
        if container_id.trim().is_empty() {
            return Err(MapError::MissingContainer);
        }
        let viewport = Viewport::new(options.center, options.zoom, 0.0, 0.0);
        let tile_filter = style::tile_filter(&options.styles);
        Ok(MapWidget {
            container_id: container_id.to_string(),
            options,
            viewport,
            markers: Vec::new(),
            popup: Popup::new(site),
            tile_filter,
        })
    }

    /// Build the map and one marker per record. Every record is validated
    /// before any marker is created.
    pub fn from_records(
        container_id: &str,
        options: MapOptions,
        site: &SiteConfig,
        records: &ProjectRecords,
    ) -> Result<Self, MapError> {
        validate_records(records)?;
        let mut widget = MapWidget::new(container_id, options, site)?;
        for (key, record) in records {
            widget.add_marker(
                record.country_coords.into(),
                MarkerArgs {
                    project_count: record.project_count,
                    country_name: record.country_name.clone(),
                    marker_id: Some(marker_dom_id(key)),
                },
            );
        }
        Ok(widget)
    }

    pub fn add_marker(&mut self, position: LatLng, args: MarkerArgs) -> MarkerId {
        let id = self.markers.len();
        self.markers.push(MarkerOverlay::new(id, position, args));
        id
    }

    /// The live marker built from the record with `key`.
    pub fn find_marker(&self, key: &str) -> Option<MarkerId> {
        let dom_id = marker_dom_id(key);
        self.markers
            .iter()
            .find(|m| !m.is_removed() && m.args().marker_id.as_deref() == Some(dom_id.as_str()))
            .map(|m| m.id())
    }

    /// Open the popup on the marker for `key`, or close it when `key` is `None`.
    /// Unknown keys leave the map untouched.
    pub fn focus(&mut self, key: Option<&str>) -> bool {
        match key {
            Some(key) => match self.find_marker(key) {
                Some(id) => self.handle_event(MapEvent::MarkerClicked(id)),
                None => false,
            },
            None => self.handle_event(MapEvent::PopupClosed),
        }
    }

    /// Detach a marker's element. Closes the popup if it was anchored there.
    pub fn remove_marker(&mut self, id: MarkerId) -> Result<bool, MapError> {
        let marker = self.markers.get_mut(id).ok_or(MapError::UnknownMarker(id))?;
        let removed = marker.remove();
        if self.popup.anchor() == Some(id) {
            self.popup.close();
        }
        Ok(removed)
    }

    /// Dispatch a user interaction. Returns whether it changed anything.
    pub fn handle_event(&mut self, event: MapEvent) -> bool {
        match event {
            MapEvent::MarkerClicked(id) => self.activate(id),
            MapEvent::PopupClosed => {
                let was_open = self.popup.close();
                self.clear_active();
                was_open
            }
        }
    }

    fn activate(&mut self, id: MarkerId) -> bool {
        match self.markers.get(id) {
            Some(m) if !m.is_removed() => {}
            _ => return false,
        }
        self.clear_active();
        self.popup.open(id);
        self.markers[id].set_active(true)
    }

    fn clear_active(&mut self) {
        for m in &mut self.markers {
            m.set_active(false);
        }
    }

    /// Lay out every live marker for the current viewport.
    pub fn draw_all(&mut self) -> Vec<(MarkerId, PixelPoint)> {
        let viewport = self.viewport;
        self.markers
            .iter_mut()
            .filter(|m| !m.is_removed())
            .filter_map(|m| m.draw(&viewport).ok().map(|at| (m.id(), at)))
            .collect()
    }

    /// Where the open popup's top-left corner goes, relative to the container.
    pub fn popup_position(&self) -> Option<PixelPoint> {
        let anchor = self.popup.anchor()?;
        let marker = self.markers.get(anchor)?;
        Some(self.popup.screen_position(self.viewport.project(marker.position())))
    }

    pub fn active_marker(&self) -> Option<MarkerId> {
        self.markers.iter().find(|m| m.is_active()).map(|m| m.id())
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.viewport.pan_by(dx, dy);
    }

    pub fn zoom_in(&mut self) -> bool {
        let z = self.viewport.zoom.saturating_add(1);
        self.viewport.set_zoom(z)
    }

    pub fn zoom_out(&mut self) -> bool {
        let z = self.viewport.zoom.saturating_sub(1);
        self.viewport.set_zoom(z)
    }

    /// Back to the configured center and zoom.
    pub fn reset_view(&mut self) {
        self.viewport.center = self.options.center;
        self.viewport.set_zoom(self.options.zoom);
    }

    pub fn scroll_wheel_enabled(&self) -> bool {
        self.options.scroll_wheel
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn markers(&self) -> &[MarkerOverlay] {
        &self.markers
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    pub fn styles(&self) -> &[StyleRule] {
        &self.options.styles
    }

    /// CSS filter for the raster tile layer.
    pub fn tile_filter(&self) -> &str {
        &self.tile_filter
    }

    pub fn water_color(&self) -> Option<&str> {
        style::water_color(&self.options.styles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CountryCoords, ProjectRecord};

    fn record(lat: f64, lng: f64, count: u32, name: &str) -> ProjectRecord {
        ProjectRecord {
            country_coords: CountryCoords {
                latitude: lat,
                longitude: lng,
            },
            project_count: count,
            country_name: name.to_string(),
        }
    }

    fn records() -> ProjectRecords {
        let mut r = ProjectRecords::new();
        r.insert("0".into(), record(-1.29, 36.82, 12, "Kenya"));
        r.insert("1".into(), record(9.08, 8.68, 3, "Nigeria"));
        r.insert("2".into(), record(-6.37, 34.89, 7, "Tanzania"));
        r.insert("3".into(), record(1.37, 32.29, 1, "Uganda"));
        r
    }

    fn widget() -> MapWidget {
        let mut w = MapWidget::from_records(
            "project-map",
            MapOptions::default(),
            &SiteConfig::default(),
            &records(),
        )
        .unwrap();
        w.resize(1200.0, 700.0);
        w
    }

    fn active_count(w: &MapWidget) -> usize {
        w.markers().iter().filter(|m| m.is_active()).count()
    }

    #[test]
    fn test_bootstrap_uses_default_view() {
        let w = widget();
        assert_eq!(w.viewport().center, DEFAULT_CENTER);
        assert_eq!(w.viewport().zoom, DEFAULT_ZOOM);
        assert!(!w.scroll_wheel_enabled());
        assert_eq!(w.styles(), style::default_styles().as_slice());
        assert_eq!(w.tile_filter(), "saturate(0) brightness(1.2)");
        assert_eq!(w.water_color(), Some("#c9d6df"));
    }

    #[test]
    fn test_missing_container_is_rejected() {
        let err = MapWidget::new("  ", MapOptions::default(), &SiteConfig::default()).unwrap_err();
        assert_eq!(err, MapError::MissingContainer);
    }

    #[test]
    fn test_invalid_record_fails_whole_initialisation() {
        let mut r = records();
        r.insert("9".into(), record(0.0, 500.0, 2, "Broken"));
        let err = MapWidget::from_records("project-map", MapOptions::default(), &SiteConfig::default(), &r)
            .unwrap_err();
        assert!(matches!(err, MapError::InvalidRecord { ref key, .. } if key == "9"));
    }

    #[test]
    fn test_one_marker_per_record_with_labels() {
        let mut w = widget();
        assert_eq!(w.markers().len(), 4);
        w.draw_all();
        let recs = records();
        for (m, (key, rec)) in w.markers().iter().zip(recs.iter()) {
            let el = m.element().unwrap();
            assert_eq!(el.collapsed_label, format!("{} Projects", rec.project_count));
            assert_eq!(el.expanded_label, rec.country_name);
            assert_eq!(el.id.as_deref(), Some(format!("project-marker-{}", key).as_str()));
        }
    }

    #[test]
    fn test_draw_all_positions_from_projection() {
        let mut w = widget();
        let drawn = w.draw_all();
        assert_eq!(drawn.len(), 4);
        for (id, at) in drawn {
            let p = w.viewport().project(w.markers()[id].position());
            assert!((at.x - (p.x - 15.0)).abs() < 1e-9);
            assert!((at.y - (p.y - 38.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_click_opens_popup_and_activates_marker() {
        let mut w = widget();
        assert!(w.handle_event(MapEvent::MarkerClicked(2)));
        assert_eq!(w.popup().anchor(), Some(2));
        assert_eq!(w.active_marker(), Some(2));
    }

    #[test]
    fn test_click_a_then_b_moves_active_state() {
        let mut w = widget();
        w.draw_all();
        w.handle_event(MapEvent::MarkerClicked(0));
        w.handle_event(MapEvent::MarkerClicked(1));
        assert!(!w.markers()[0].is_active());
        assert!(!w.markers()[0].element().unwrap().active);
        assert!(w.markers()[1].element().unwrap().active);
        assert_eq!(w.popup().anchor(), Some(1));
    }

    #[test]
    fn test_at_most_one_active_for_any_click_sequence() {
        let mut w = widget();
        w.draw_all();
        // Deterministic pseudo-random walk over markers and close clicks
        let mut state: u32 = 17;
        for _ in 0..200 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let pick = (state >> 16) % 5;
            let event = if pick == 4 {
                MapEvent::PopupClosed
            } else {
                MapEvent::MarkerClicked(pick as usize)
            };
            w.handle_event(event);
            assert!(active_count(&w) <= 1);
            assert_eq!(w.active_marker(), w.popup().anchor());
        }
    }

    #[test]
    fn test_popup_content_same_for_every_marker() {
        let mut w = widget();
        w.handle_event(MapEvent::MarkerClicked(0));
        let first = w.popup().content().to_string();
        w.handle_event(MapEvent::MarkerClicked(3));
        assert_eq!(w.popup().content(), first);
    }

    #[test]
    fn test_close_clears_active_after_many_clicks() {
        let mut w = widget();
        for id in [0, 1, 2, 1, 0, 3, 3] {
            w.handle_event(MapEvent::MarkerClicked(id));
        }
        assert!(w.handle_event(MapEvent::PopupClosed));
        assert_eq!(active_count(&w), 0);
        assert!(!w.popup().is_open());
        // A second close has nothing left to do
        assert!(!w.handle_event(MapEvent::PopupClosed));
    }

    #[test]
    fn test_unknown_marker_click_is_ignored() {
        let mut w = widget();
        assert!(!w.handle_event(MapEvent::MarkerClicked(42)));
        assert!(!w.popup().is_open());
    }

    #[test]
    fn test_removed_marker_click_is_ignored() {
        let mut w = widget();
        w.draw_all();
        w.handle_event(MapEvent::MarkerClicked(1));
        assert_eq!(w.remove_marker(0), Ok(true));
        assert!(!w.handle_event(MapEvent::MarkerClicked(0)));
        assert_eq!(w.active_marker(), Some(1));
    }

    #[test]
    fn test_remove_anchor_closes_popup() {
        let mut w = widget();
        w.draw_all();
        w.handle_event(MapEvent::MarkerClicked(2));
        assert_eq!(w.remove_marker(2), Ok(true));
        assert!(!w.popup().is_open());
        assert_eq!(w.active_marker(), None);
        assert!(w.popup_position().is_none());
    }

    #[test]
    fn test_find_marker_by_record_key() {
        let mut w = widget();
        assert_eq!(w.find_marker("2"), Some(2));
        assert_eq!(w.find_marker("nope"), None);
        w.remove_marker(2).unwrap();
        assert_eq!(w.find_marker("2"), None);
    }

    #[test]
    fn test_focus_follows_changing_key() {
        let mut w = widget();
        assert!(w.focus(Some("1")));
        assert_eq!(w.active_marker(), Some(1));
        assert_eq!(w.popup().anchor(), Some(1));

        assert!(w.focus(Some("3")));
        assert_eq!(w.active_marker(), Some(3));
        assert_eq!(w.popup().anchor(), Some(3));
        assert_eq!(active_count(&w), 1);

        assert!(!w.focus(Some("missing")));
        assert_eq!(w.active_marker(), Some(3));

        assert!(w.focus(None));
        assert_eq!(w.active_marker(), None);
        assert!(!w.popup().is_open());
    }

    #[test]
    fn test_remove_unknown_marker() {
        let mut w = widget();
        assert_eq!(w.remove_marker(9), Err(MapError::UnknownMarker(9)));
    }

    #[test]
    fn test_draw_all_skips_removed() {
        let mut w = widget();
        w.remove_marker(1).unwrap();
        let drawn = w.draw_all();
        assert_eq!(drawn.len(), 3);
        assert!(drawn.iter().all(|(id, _)| *id != 1));
        assert!(w.markers()[1].element().is_none());
    }

    #[test]
    fn test_popup_position_follows_anchor() {
        let mut w = widget();
        w.handle_event(MapEvent::MarkerClicked(0));
        let anchor = w.viewport().project(w.markers()[0].position());
        let at = w.popup_position().unwrap();
        assert_eq!(at, anchor.offset(-150.0, -300.0));
    }

    #[test]
    fn test_zoom_controls_respect_limits() {
        let mut w = widget();
        assert!(w.zoom_out());
        assert_eq!(w.viewport().zoom, 2);
        assert!(!w.zoom_out());
        assert!(w.zoom_in());
        assert_eq!(w.viewport().zoom, 3);
    }

    #[test]
    fn test_reset_view_restores_options() {
        let mut w = widget();
        w.pan_by(300.0, 120.0);
        w.zoom_in();
        w.reset_view();
        assert_eq!(w.viewport().center, DEFAULT_CENTER);
        assert_eq!(w.viewport().zoom, DEFAULT_ZOOM);
    }
}
