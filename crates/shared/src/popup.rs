use crate::geo::PixelPoint;
use crate::marker::MarkerId;
use crate::models::SiteConfig;

/// Popup position relative to its anchor marker's element.
pub const POPUP_PIXEL_OFFSET: PixelPoint = PixelPoint { x: -150.0, y: -300.0 };

pub const POPUP_CLASS: &str = "project-popup";

pub const PLACEHOLDER_IMAGE_COUNT: usize = 6;

const PLACEHOLDER_IMAGE_PATH: &str = "static/images/placeholder.svg";
const CLOSE_ICON_PATH: &str = "static/images/close.svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState {
    Closed,
    Open { anchor: MarkerId },
}

/// The info panel shared by every marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    content: String,
    placeholder: String,
    pub pixel_offset: PixelPoint,
    pub container_class: String,
    pub close_icon_url: String,
    state: PopupState,
}

/// A row of placeholder thumbnails.
// TODO: per-country content once the site publishes project thumbnails per record.
pub fn placeholder_content(site: &SiteConfig) -> String {
    let src = site.asset_url(PLACEHOLDER_IMAGE_PATH);
    let mut html = String::from(r#"<div class="popup-row">"#);
    for _ in 0..PLACEHOLDER_IMAGE_COUNT {
        html.push_str(&format!(
            r#"<img class="popup-thumb" src="{src}" alt="" width="64" height="64">"#
        ));
    }
    html.push_str("</div>");
    html
}

impl Popup {
    pub fn new(site: &SiteConfig) -> Self {
        let placeholder = placeholder_content(site);
        Popup {
            content: placeholder.clone(),
            placeholder,
            pixel_offset: POPUP_PIXEL_OFFSET,
            container_class: POPUP_CLASS.to_string(),
            close_icon_url: site.asset_url(CLOSE_ICON_PATH),
            state: PopupState::Closed,
        }
    }

    /// Open anchored to `anchor`, replacing whatever content was shown before.
    pub fn open(&mut self, anchor: MarkerId) {
        self.content = self.placeholder.clone();
        self.state = PopupState::Open { anchor };
    }

    /// Returns whether the popup was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.state = PopupState::Closed;
        was_open
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PopupState::Open { .. })
    }

    pub fn state(&self) -> PopupState {
        self.state
    }

    pub fn anchor(&self) -> Option<MarkerId> {
        match self.state {
            PopupState::Open { anchor } => Some(anchor),
            PopupState::Closed => None,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Where the popup's top-left goes for an anchor drawn at `anchor_px`.
    pub fn screen_position(&self, anchor_px: PixelPoint) -> PixelPoint {
        anchor_px.offset(self.pixel_offset.x, self.pixel_offset.y)
    }
}
