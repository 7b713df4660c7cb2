//! Spherical Web Mercator projection and viewport math.
//!
//! The world at zoom `z` is a square of `TILE_SIZE * 2^z` pixels, split into
//! `2^z x 2^z` tiles. Pixel Y grows southwards.
use serde::{Deserialize, Serialize};

/// Edge length of one raster tile in pixels.
pub const TILE_SIZE: f64 = 256.0;

pub const MIN_ZOOM: u8 = 2;
pub const MAX_ZOOM: u8 = 18;

/// Sine of latitude is clamped to this so the poles don't project to infinity (~85.05°).
const MAX_SIN_LAT: f64 = 0.9999;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        PixelPoint { x, y }
    }

    /// Shift the point by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        PixelPoint {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Width (and height) of the whole world in pixels at `zoom`, clamped to `MAX_ZOOM`.
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * (1u64 << zoom.min(MAX_ZOOM)) as f64
}

/// Project a coordinate to absolute world pixels at `zoom`.
pub fn world_px(pos: LatLng, zoom: u8) -> PixelPoint {
    let ws = world_size(zoom);
    let sin_lat = pos.lat.to_radians().sin().clamp(-MAX_SIN_LAT, MAX_SIN_LAT);
    let x = (pos.lng + 180.0) / 360.0 * ws;
    let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * std::f64::consts::PI)) * ws;
    PixelPoint { x, y }
}

/// Inverse of [`world_px`]. Longitude is wrapped into `[-180, 180)`.
pub fn world_px_to_lat_lng(px: PixelPoint, zoom: u8) -> LatLng {
    let ws = world_size(zoom);
    let lng = wrap_lng(px.x / ws * 360.0 - 180.0);
    let n = std::f64::consts::PI * (1.0 - 2.0 * px.y / ws);
    let lat = n.sinh().atan().to_degrees();
    LatLng { lat, lng }
}

fn wrap_lng(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Substitute `{z}`, `{x}` and `{y}` in a slippy-map URL template.
pub fn tile_url(template: &str, z: u8, x: u32, y: u32) -> String {
    template
        .replace("{z}", &z.to_string())
        .replace("{x}", &x.to_string())
        .replace("{y}", &y.to_string())
}

/// A tile to draw, with its container-relative top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub z: u8,
    /// Unwrapped column; differs from `x` when the world repeats across the container.
    pub col: i64,
    pub x: u32,
    pub y: u32,
    pub left: f64,
    pub top: f64,
}

/// The visible window onto the map: center, zoom and container size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: u8, width: f64, height: f64) -> Self {
        Viewport {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        }
    }

    fn center_world(&self) -> PixelPoint {
        world_px(self.center, self.zoom)
    }

    /// Container-relative pixel position of `pos`.
    ///
    /// Horizontally the nearest copy of the world is used, so markers near the
    /// antimeridian stay next to the center instead of jumping a world away.
    pub fn project(&self, pos: LatLng) -> PixelPoint {
        let ws = world_size(self.zoom);
        let c = self.center_world();
        let p = world_px(pos, self.zoom);
        let mut dx = p.x - c.x;
        if dx > ws / 2.0 {
            dx -= ws;
        } else if dx < -ws / 2.0 {
            dx += ws;
        }
        PixelPoint {
            x: self.width / 2.0 + dx,
            y: self.height / 2.0 + (p.y - c.y),
        }
    }

    /// Geographic coordinate under a container-relative pixel.
    pub fn unproject(&self, point: PixelPoint) -> LatLng {
        let c = self.center_world();
        let world = PixelPoint {
            x: c.x + point.x - self.width / 2.0,
            y: c.y + point.y - self.height / 2.0,
        };
        world_px_to_lat_lng(world, self.zoom)
    }

    /// Move the map content by `(dx, dy)` screen pixels, as a drag does.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let ws = world_size(self.zoom);
        let c = self.center_world();
        let next = PixelPoint {
            x: c.x - dx,
            y: (c.y - dy).clamp(0.0, ws),
        };
        self.center = world_px_to_lat_lng(next, self.zoom);
    }

    /// Set the zoom level, clamped to `MIN_ZOOM..=MAX_ZOOM`. Returns whether it changed.
    pub fn set_zoom(&mut self, zoom: u8) -> bool {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let changed = zoom != self.zoom;
        self.zoom = zoom;
        changed
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Tiles covering the container. Columns wrap around the antimeridian,
    /// rows beyond the poles are skipped.
    pub fn visible_tiles(&self) -> Vec<TilePlacement> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec::new();
        }
        let n = 1i64 << self.zoom;
        let c = self.center_world();
        let left = c.x - self.width / 2.0;
        let top = c.y - self.height / 2.0;

        let x0 = (left / TILE_SIZE).floor() as i64;
        let x1 = ((left + self.width) / TILE_SIZE).floor() as i64;
        let y0 = (top / TILE_SIZE).floor() as i64;
        let y1 = ((top + self.height) / TILE_SIZE).floor() as i64;

        let mut tiles = Vec::new();
        for ty in y0..=y1 {
            if ty < 0 || ty >= n {
                continue;
            }
            for tx in x0..=x1 {
                tiles.push(TilePlacement {
                    z: self.zoom,
                    col: tx,
                    x: tx.rem_euclid(n) as u32,
                    y: ty as u32,
                    left: tx as f64 * TILE_SIZE - left,
                    top: ty as f64 * TILE_SIZE - top,
                });
            }
        }
        tiles
    }
}
