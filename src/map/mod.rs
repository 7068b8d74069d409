//! Slippy-map math shared by the canvas and the tile fetcher.

pub mod projection;
pub mod tiles;

pub use projection::{WorldPoint, project, unproject};
pub use tiles::{TileId, visible_tiles};

use crate::common::Coordinates;

pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 18;

/// Center and zoom of the visible map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
}

impl MapView {
    pub fn new(center: Coordinates, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Moves the map with a drag of `(dx, dy)` screen pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let center = project(self.center, self.zoom);
        self.center = unproject(WorldPoint::new(center.x - dx, center.y - dy), self.zoom);
    }

    /// Changes zoom while keeping the point under `anchor` (pixels from the
    /// viewport center) in place.
    pub fn zoom_around(&mut self, delta: i8, anchor: (f64, f64)) {
        let zoom = (i16::from(self.zoom) + i16::from(delta))
            .clamp(i16::from(MIN_ZOOM), i16::from(MAX_ZOOM)) as u8;
        if zoom == self.zoom {
            return;
        }

        let pinned = self.offset_to_coords(anchor);
        let pinned_world = project(pinned, zoom);
        self.zoom = zoom;
        self.center = unproject(
            WorldPoint::new(pinned_world.x - anchor.0, pinned_world.y - anchor.1),
            zoom,
        );
    }

    /// Pixel offset of `coords` from the viewport center, using the world copy
    /// nearest to the center.
    pub fn coords_to_offset(&self, coords: Coordinates) -> (f64, f64) {
        let size = projection::world_size(self.zoom);
        let center = project(self.center, self.zoom);
        let point = project(coords, self.zoom);

        let mut dx = point.x - center.x;
        if dx > size / 2.0 {
            dx -= size;
        } else if dx < -size / 2.0 {
            dx += size;
        }
        (dx, point.y - center.y)
    }

    pub fn offset_to_coords(&self, offset: (f64, f64)) -> Coordinates {
        let center = project(self.center, self.zoom);
        unproject(
            WorldPoint::new(center.x + offset.0, center.y + offset.1),
            self.zoom,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Coordinates, b: Coordinates) -> bool {
        (a.lat - b.lat).abs() < 1e-6 && (a.lng - b.lng).abs() < 1e-6
    }

    #[test]
    fn zoom_is_clamped() {
        assert_eq!(MapView::new(Coordinates::new(0.0, 0.0), 0).zoom, MIN_ZOOM);
        assert_eq!(MapView::new(Coordinates::new(0.0, 0.0), 30).zoom, MAX_ZOOM);
    }

    #[test]
    fn center_maps_to_zero_offset() {
        let view = MapView::new(Coordinates::new(25.03, 121.56), 5);
        let (dx, dy) = view.coords_to_offset(view.center);
        assert!(dx.abs() < 1e-9 && dy.abs() < 1e-9);
        assert!(close(view.offset_to_coords((0.0, 0.0)), view.center));
    }

    #[test]
    fn clicks_past_the_antimeridian_wrap() {
        let view = MapView::new(Coordinates::new(0.0, 179.0), 3);
        let coords = view.offset_to_coords((200.0, 0.0));
        assert!((-180.0..=180.0).contains(&coords.lng));
        assert!(coords.lng < 0.0);
    }

    #[test]
    fn markers_use_nearest_world_copy() {
        let view = MapView::new(Coordinates::new(0.0, 179.0), 3);
        let (dx, _) = view.coords_to_offset(Coordinates::new(0.0, -179.0));
        assert!(dx > 0.0 && dx < 100.0);
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut view = MapView::new(Coordinates::new(20.0, 0.0), 4);
        let anchor = (120.0, -40.0);
        let before = view.offset_to_coords(anchor);

        view.zoom_around(1, anchor);
        assert_eq!(view.zoom, 5);
        assert!(close(view.offset_to_coords(anchor), before));
    }

    #[test]
    fn pan_moves_opposite_to_drag() {
        let mut view = MapView::new(Coordinates::new(0.0, 0.0), 2);
        view.pan_by(100.0, 0.0);
        assert!(view.center.lng < 0.0);
    }
}
