use super::projection::{TILE_SIZE, WorldPoint};

const SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    /// Fills `{z}`, `{x}`, `{y}` and the optional `{s}` subdomain.
    pub fn url(&self, template: &str) -> String {
        let subdomain = SUBDOMAINS[((self.x + self.y) % 3) as usize];
        template
            .replace("{s}", subdomain)
            .replace("{z}", &self.zoom.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}

/// Tiles covering a `width` x `height` viewport centered on `center`, each
/// with the unwrapped world position of its top-left corner.
pub fn visible_tiles(center: WorldPoint, zoom: u8, width: f64, height: f64) -> Vec<(TileId, WorldPoint)> {
    let count = 1i64 << zoom;

    let first_x = ((center.x - width / 2.0) / TILE_SIZE).floor() as i64;
    let last_x = ((center.x + width / 2.0) / TILE_SIZE).floor() as i64;
    let first_y = (((center.y - height / 2.0) / TILE_SIZE).floor() as i64).max(0);
    let last_y = (((center.y + height / 2.0) / TILE_SIZE).floor() as i64).min(count - 1);

    let mut tiles = Vec::new();
    for ty in first_y..=last_y {
        for tx in first_x..=last_x {
            let id = TileId {
                zoom,
                x: tx.rem_euclid(count) as u32,
                y: ty as u32,
            };
            let origin = WorldPoint::new(tx as f64 * TILE_SIZE, ty as f64 * TILE_SIZE);
            tiles.push((id, origin));
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_template_is_filled() {
        let tile = TileId { zoom: 3, x: 6, y: 2 };
        assert_eq!(
            tile.url("https://tile.openstreetmap.org/{z}/{x}/{y}.png"),
            "https://tile.openstreetmap.org/3/6/2.png"
        );
        assert_eq!(
            tile.url("https://{s}.tile.example.org/{z}/{x}/{y}.png"),
            "https://c.tile.example.org/3/6/2.png"
        );
    }

    #[test]
    fn whole_world_at_zoom_one() {
        let tiles = visible_tiles(WorldPoint::new(256.0, 256.0), 1, 512.0, 512.0);
        let ids: Vec<_> = tiles.iter().map(|(id, _)| (id.x, id.y)).collect();
        assert!(ids.contains(&(0, 0)));
        assert!(ids.contains(&(1, 1)));
        assert!(ids.iter().all(|&(x, y)| x < 2 && y < 2));
    }

    #[test]
    fn horizontal_overflow_wraps_tile_index() {
        let tiles = visible_tiles(WorldPoint::new(10.0, 256.0), 1, 300.0, 100.0);
        let left = tiles
            .iter()
            .find(|(_, origin)| origin.x < 0.0)
            .expect("tile left of the antimeridian");
        assert_eq!(left.0.x, 1);
    }

    #[test]
    fn rows_never_leave_the_world() {
        let tiles = visible_tiles(WorldPoint::new(256.0, 0.0), 1, 256.0, 2000.0);
        assert!(tiles.iter().all(|(id, _)| id.y < 2));
    }
}
