use thiserror::Error;

use crate::marker::MarkerId;

/// Failures surfaced while building or driving a map widget.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// The widget was asked to mount into a container with no identifier.
    #[error("Map container element id is empty")]
    MissingContainer,
    /// A project record failed validation. `key` is the record's index key.
    #[error("Invalid project record '{key}': {reason}")]
    InvalidRecord { key: String, reason: String },
    /// The marker was removed and can no longer be positioned.
    #[error("Marker {0} has been removed")]
    MarkerRemoved(MarkerId),
    #[error("Unknown marker {0}")]
    UnknownMarker(MarkerId),
}
