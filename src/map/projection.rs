use std::f64::consts::PI;

use crate::common::Coordinates;

pub const TILE_SIZE: f64 = 256.0;

/// Web Mercator cuts off the poles here.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Pixel position in the unwrapped world at a given zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * 2f64.powi(i32::from(zoom))
}

pub fn wrap_lng(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

pub fn project(coords: Coordinates, zoom: u8) -> WorldPoint {
    let size = world_size(zoom);
    let lat = coords.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

    WorldPoint {
        x: (coords.lng + 180.0) / 360.0 * size,
        y: (1.0 - lat.tan().asinh() / PI) / 2.0 * size,
    }
}

pub fn unproject(point: WorldPoint, zoom: u8) -> Coordinates {
    let size = world_size(zoom);
    let y = point.y.clamp(0.0, size);
    let lat = (PI * (1.0 - 2.0 * y / size)).sinh().atan().to_degrees();

    Coordinates {
        lat,
        lng: wrap_lng(point.x / size * 360.0 - 180.0),
    }
}
