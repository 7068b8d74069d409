use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2, pos2, vec2};

use crate::common::{Coordinates, Message};
use crate::map::projection::world_size;
use crate::map::{MapView, project, visible_tiles};
use crate::network::TileCache;

const OCEAN: Color32 = Color32::from_rgb(170, 211, 223);
const MARKER_ICON: &str = "👑";
const MARKER_HIT_RADIUS: f32 = 14.0;
// The icon sits above the point it marks.
const MARKER_LIFT: f32 = 12.0;
const SCROLL_PER_ZOOM_STEP: f32 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub enum MapAction {
    Clicked(Coordinates),
    MarkerClicked(String),
}

/// What to draw on top of the tiles.
pub struct Layers<'a> {
    pub messages: &'a [Message],
    pub pending: Option<Coordinates>,
    pub selected: Option<&'a Message>,
    pub attribution: &'a str,
}

/// Interactive slippy map: drag to pan, scroll to zoom, click to pick.
pub struct MapCanvas {
    tiles: TileCache,
    scroll: f32,
}

impl MapCanvas {
    pub fn new(tiles: TileCache) -> Self {
        Self { tiles, scroll: 0.0 }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, view: &mut MapView, layers: &Layers<'_>) -> Option<MapAction> {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());

        if response.dragged() {
            let delta = response.drag_delta();
            view.pan_by(f64::from(delta.x), f64::from(delta.y));
        }

        if response.hovered() {
            self.scroll += ui.input(|input| input.raw_scroll_delta.y);
            if self.scroll.abs() >= SCROLL_PER_ZOOM_STEP {
                let step = if self.scroll > 0.0 { 1 } else { -1 };
                let anchor = response
                    .hover_pos()
                    .map(|pos| pos - rect.center())
                    .unwrap_or(Vec2::ZERO);
                view.zoom_around(step, (f64::from(anchor.x), f64::from(anchor.y)));
                self.scroll = 0.0;
            }
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, OCEAN);
        self.paint_tiles(&painter, rect, view);

        for message in layers.messages.iter().rev() {
            for point in marker_copies(view, rect, message.position()) {
                painter.text(point, Align2::CENTER_BOTTOM, MARKER_ICON, FontId::proportional(24.0), Color32::GOLD);
            }
        }

        if let Some(pending) = layers.pending {
            let point = to_screen(view, rect, pending);
            painter.circle_filled(point, 7.0, Color32::from_rgb(220, 38, 38));
            painter.circle_stroke(point, 7.0, Stroke::new(2.0, Color32::WHITE));
        }

        if let Some(message) = layers.selected
            && let Some(anchor) = popup_anchor(view, rect, message)
        {
            popup(ui.ctx(), anchor, message);
        }

        attribution(&painter, rect, layers.attribution);

        if !response.clicked() {
            return None;
        }
        let pointer = response.interact_pointer_pos()?;
        if let Some(message) = marker_at(view, rect, layers.messages, pointer) {
            return Some(MapAction::MarkerClicked(message.id.clone()));
        }
        let offset = pointer - rect.center();
        Some(MapAction::Clicked(
            view.offset_to_coords((f64::from(offset.x), f64::from(offset.y))),
        ))
    }

    fn paint_tiles(&mut self, painter: &egui::Painter, rect: Rect, view: &MapView) {
        self.tiles.poll();

        let center = project(view.center, view.zoom);
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        let tiles = visible_tiles(center, view.zoom, f64::from(rect.width()), f64::from(rect.height()));

        for (id, origin) in tiles {
            let Some(texture) = self.tiles.texture(id) else {
                continue;
            };
            let min = rect.center() + vec2((origin.x - center.x) as f32, (origin.y - center.y) as f32);
            let tile_rect = Rect::from_min_size(min, Vec2::splat(256.0));
            painter.image(texture, tile_rect, uv, Color32::WHITE);
        }
    }
}

fn to_screen(view: &MapView, rect: Rect, coords: Coordinates) -> Pos2 {
    let (dx, dy) = view.coords_to_offset(coords);
    rect.center() + vec2(dx as f32, dy as f32)
}

/// Screen positions of every world copy of `coords` that can show up in
/// `rect`. Zoomed out far enough, the world repeats side by side.
fn marker_copies(view: &MapView, rect: Rect, coords: Coordinates) -> Vec<Pos2> {
    let nearest = to_screen(view, rect, coords);
    let size = world_size(view.zoom) as f32;
    let bounds = rect.expand(MARKER_HIT_RADIUS * 2.0);
    let reach = (bounds.width() / size).ceil() as i32 + 1;

    (-reach..=reach)
        .map(|copy| nearest + vec2(copy as f32 * size, 0.0))
        .filter(|point| bounds.contains(*point))
        .collect()
}

/// Topmost marker under `pointer`. Messages are newest first and painted in
/// reverse, so the first hit is the one drawn on top.
fn marker_at<'a>(view: &MapView, rect: Rect, messages: &'a [Message], pointer: Pos2) -> Option<&'a Message> {
    messages.iter().find(|message| {
        marker_copies(view, rect, message.position())
            .into_iter()
            .any(|point| (point - vec2(0.0, MARKER_LIFT)).distance(pointer) <= MARKER_HIT_RADIUS)
    })
}

/// Where the selected marker's popup goes: the visible copy closest to the
/// viewport center, or nowhere once the marker has left the map.
fn popup_anchor(view: &MapView, rect: Rect, message: &Message) -> Option<Pos2> {
    let center = rect.center();
    marker_copies(view, rect, message.position())
        .into_iter()
        .filter(|point| rect.contains(*point))
        .min_by(|a, b| a.distance(center).total_cmp(&b.distance(center)))
}

fn popup(ctx: &egui::Context, anchor: Pos2, message: &Message) {
    egui::Area::new(egui::Id::new("marker_popup"))
        .fixed_pos(anchor + vec2(8.0, -MARKER_LIFT * 2.0))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_max_width(240.0);
                ui.label(egui::RichText::new(message.author()).strong());
                ui.label(egui::RichText::new(&message.message).small());
            });
        });
}

fn attribution(painter: &egui::Painter, rect: Rect, text: &str) {
    let color = Color32::from_gray(60);
    let galley = painter.layout_no_wrap(text.to_string(), FontId::proportional(11.0), color);
    let pos = rect.right_bottom() - galley.size() - vec2(6.0, 4.0);

    painter.rect_filled(
        Rect::from_min_size(pos - vec2(3.0, 1.0), galley.size() + vec2(6.0, 2.0)),
        2.0,
        Color32::from_white_alpha(200),
    );
    painter.galley(pos, galley, color);
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn message(id: &str, lat: f64, lng: f64) -> Message {
        Message {
            id: id.to_string(),
            lat,
            lng,
            message: "hi".to_string(),
            display_name: None,
            created_at: Utc::now(),
        }
    }

    fn viewport() -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0))
    }

    #[test]
    fn hit_test_prefers_newest_marker() {
        let view = MapView::new(Coordinates::new(0.0, 0.0), 3);
        let messages = [message("newer", 0.0, 0.0), message("older", 0.0, 0.0)];
        let icon = viewport().center() - vec2(0.0, MARKER_LIFT);

        let hit = marker_at(&view, viewport(), &messages, icon).unwrap();
        assert_eq!(hit.id, "newer");
    }

    #[test]
    fn clicks_away_from_markers_miss() {
        let view = MapView::new(Coordinates::new(0.0, 0.0), 3);
        let messages = [message("only", 0.0, 0.0)];
        let far = viewport().center() + vec2(200.0, 150.0);

        assert!(marker_at(&view, viewport(), &messages, far).is_none());
    }

    #[test]
    fn screen_position_follows_view_center() {
        let view = MapView::new(Coordinates::new(25.03, 121.56), 6);
        let point = to_screen(&view, viewport(), Coordinates::new(25.03, 121.56));
        assert!(point.distance(viewport().center()) < 0.01);
    }

    #[test]
    fn zoomed_out_markers_repeat_on_every_world_copy() {
        // At zoom 1 the world is 512 px wide, so a 1600 px viewport shows it
        // at least three times.
        let view = MapView::new(Coordinates::new(0.0, 0.0), 1);
        let wide = Rect::from_min_size(Pos2::ZERO, vec2(1600.0, 600.0));
        let copies = marker_copies(&view, wide, Coordinates::new(0.0, 0.0));
        assert!(copies.len() >= 3, "only {} copies", copies.len());

        let messages = [message("repeated", 0.0, 0.0)];
        let far_copy = wide.center() + vec2(512.0, -MARKER_LIFT);
        let hit = marker_at(&view, wide, &messages, far_copy).unwrap();
        assert_eq!(hit.id, "repeated");
    }

    #[test]
    fn popup_follows_the_marker_until_it_leaves_the_map() {
        let mut view = MapView::new(Coordinates::new(0.0, 0.0), 5);
        let selected = message("selected", 0.0, 0.0);

        let anchor = popup_anchor(&view, viewport(), &selected).unwrap();
        assert!(anchor.distance(viewport().center()) < 0.01);

        view.pan_by(-2000.0, 0.0);
        assert!(popup_anchor(&view, viewport(), &selected).is_none());
    }
}
