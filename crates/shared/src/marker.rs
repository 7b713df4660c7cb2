use crate::error::MapError;
use crate::geo::{LatLng, PixelPoint, Viewport};
use crate::widget::MapEvent;

/// Index of a marker within its widget.
pub type MarkerId = usize;

/// The marker's pin tip sits 15px right of and 38px below its element's top-left corner.
pub const ANCHOR_OFFSET_X: f64 = -15.0;
pub const ANCHOR_OFFSET_Y: f64 = -38.0;

pub const MARKER_CLASS: &str = "project-marker";
pub const ACTIVE_CLASS: &str = "active";

/// Something drawn on the map at a geographic position and re-laid-out on every redraw.
pub trait Overlay {
    fn position(&self) -> LatLng;

    /// Lay the overlay out for the current viewport and return its element's
    /// top-left pixel position.
    fn draw(&mut self, viewport: &Viewport) -> Result<PixelPoint, MapError>;

    /// Detach the element. Returns whether anything was attached.
    fn remove(&mut self) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerArgs {
    pub project_count: u32,
    pub country_name: String,
    pub marker_id: Option<String>,
}

impl MarkerArgs {
    /// Label shown while the marker is collapsed.
    pub fn collapsed_label(&self) -> String {
        format!("{} Projects", self.project_count)
    }

    /// Label shown on hover.
    pub fn expanded_label(&self) -> String {
        self.country_name.clone()
    }
}

/// The element a marker owns once it has been drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerElement {
    pub id: Option<String>,
    pub collapsed_label: String,
    pub expanded_label: String,
    pub left: f64,
    pub top: f64,
    pub active: bool,
}

impl MarkerElement {
    fn create(args: &MarkerArgs, at: PixelPoint, active: bool) -> Self {
        MarkerElement {
            id: args.marker_id.clone(),
            collapsed_label: args.collapsed_label(),
            expanded_label: args.expanded_label(),
            left: at.x,
            top: at.y,
            active,
        }
    }

    pub fn class_name(&self) -> String {
        if self.active {
            format!("{} {}", MARKER_CLASS, ACTIVE_CLASS)
        } else {
            MARKER_CLASS.to_string()
        }
    }

    pub fn style(&self) -> String {
        format!("left: {}px; top: {}px;", self.left, self.top)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ElementSlot {
    Pending,
    Attached(MarkerElement),
    Removed,
}

/// A country marker labelled with its project count.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOverlay {
    id: MarkerId,
    position: LatLng,
    args: MarkerArgs,
    element: ElementSlot,
    active: bool,
}

impl MarkerOverlay {
    pub fn new(id: MarkerId, position: LatLng, args: MarkerArgs) -> Self {
        MarkerOverlay {
            id,
            position,
            args,
            element: ElementSlot::Pending,
            active: false,
        }
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn args(&self) -> &MarkerArgs {
        &self.args
    }

    /// The drawn element, if the marker has been drawn and not removed.
    pub fn element(&self) -> Option<&MarkerElement> {
        match &self.element {
            ElementSlot::Attached(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_removed(&self) -> bool {
        self.element == ElementSlot::Removed
    }

    pub fn is_active(&self) -> bool {
        self.active && !self.is_removed()
    }

    /// Toggle the active class. A pending marker picks the state up on its first draw.
    /// Returns `false` for a removed marker.
    pub fn set_active(&mut self, active: bool) -> bool {
        if self.is_removed() {
            return false;
        }
        self.active = active;
        if let ElementSlot::Attached(el) = &mut self.element {
            el.active = active;
        }
        true
    }

    /// Translate a click on the element into the widget-level event.
    pub fn click(&self) -> Option<MapEvent> {
        if self.is_removed() {
            None
        } else {
            Some(MapEvent::MarkerClicked(self.id))
        }
    }
}

impl Overlay for MarkerOverlay {
    fn position(&self) -> LatLng {
        self.position
    }

    fn draw(&mut self, viewport: &Viewport) -> Result<PixelPoint, MapError> {
        if self.is_removed() {
            return Err(MapError::MarkerRemoved(self.id));
        }
        let at = viewport
            .project(self.position)
            .offset(ANCHOR_OFFSET_X, ANCHOR_OFFSET_Y);

        if let ElementSlot::Attached(el) = &mut self.element {
            el.left = at.x;
            el.top = at.y;
            return Ok(at);
        }
        self.element = ElementSlot::Attached(MarkerElement::create(&self.args, at, self.active));
        Ok(at)
    }

    fn remove(&mut self) -> bool {
        let was_attached = matches!(self.element, ElementSlot::Attached(_));
        self.element = ElementSlot::Removed;
        self.active = false;
        was_attached
    }
}
