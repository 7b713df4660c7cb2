pub mod error;
pub mod geo;
pub mod marker;
pub mod models;
pub mod popup;
pub mod style;
pub mod widget;

pub use error::MapError;
