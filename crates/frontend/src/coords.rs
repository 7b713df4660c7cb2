/// Whether a pointer moved far enough from `start` to count as a drag rather than a click.
pub fn exceeds_threshold(start: (f64, f64), current: (f64, f64), threshold: f64) -> bool {
    let dx = current.0 - start.0;
    let dy = current.1 - start.1;
    (dx * dx + dy * dy).sqrt() > threshold
}

/// Bounding rect of the element with `container_id`, if it is in the document.
pub fn container_rect(container_id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(container_id)?;
    Some(element.get_bounding_client_rect())
}

/// Rendered `(width, height)` of the container.
pub fn container_size(container_id: &str) -> Option<(f64, f64)> {
    container_rect(container_id).map(|r| (r.width(), r.height()))
}
