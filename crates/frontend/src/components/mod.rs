pub mod map_view;
pub mod marker_view;
pub mod popup_panel;
