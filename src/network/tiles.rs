use std::collections::HashMap;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::map::TileId;

const MAX_TILES: usize = 256;

#[derive(Debug, Error)]
pub enum TileError {
    #[error("tile request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("tile server responded with {0}")]
    Status(StatusCode),

    #[error("tile image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
}

enum TileSlot<T> {
    Loading,
    Ready(T),
    Failed,
}

/// Tile slots with least-recently-used eviction. Generic over the loaded
/// payload so the bookkeeping does not need a GPU context.
struct TileSlots<T> {
    entries: HashMap<TileId, (TileSlot<T>, u64)>,
    clock: u64,
    capacity: usize,
}

impl<T> TileSlots<T> {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            clock: 0,
            capacity,
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Marks the start of a new frame; tiles touched before it age.
    fn tick(&mut self) {
        self.clock += 1;
    }

    fn touch(&mut self, id: TileId) -> Option<&TileSlot<T>> {
        let clock = self.clock;
        self.entries.get_mut(&id).map(|(slot, used)| {
            *used = clock;
            &*slot
        })
    }

    fn start_loading(&mut self, id: TileId) {
        self.entries.insert(id, (TileSlot::Loading, self.clock));
    }

    fn is_loading(&self, id: TileId) -> bool {
        matches!(self.entries.get(&id), Some((TileSlot::Loading, _)))
    }

    /// Stores a finished download. Results for tiles that were evicted while
    /// in flight are dropped.
    fn finish(&mut self, id: TileId, loaded: Option<T>) -> bool {
        let Some((slot, _)) = self.entries.get_mut(&id) else {
            return false;
        };
        if !matches!(slot, TileSlot::Loading) {
            return false;
        }
        *slot = match loaded {
            Some(payload) => TileSlot::Ready(payload),
            None => TileSlot::Failed,
        };
        true
    }

    /// Drops the least recently used tiles until the cache fits its capacity.
    fn evict(&mut self) {
        let excess = self.entries.len().saturating_sub(self.capacity);
        if excess == 0 {
            return;
        }

        let mut by_age: Vec<(u64, TileId)> = self
            .entries
            .iter()
            .map(|(id, (_, used))| (*used, *id))
            .collect();
        by_age.sort_unstable_by_key(|(used, _)| *used);

        for (_, id) in by_age.into_iter().take(excess) {
            self.entries.remove(&id);
        }
    }
}

/// Background tile loader and texture cache for the map canvas.
pub struct TileCache {
    ctx: egui::Context,
    runtime: Handle,
    client: Client,
    url_template: String,
    slots: TileSlots<egui::TextureHandle>,
    loaded_sender: mpsc::UnboundedSender<(TileId, Result<egui::ColorImage, TileError>)>,
    loaded_receiver: mpsc::UnboundedReceiver<(TileId, Result<egui::ColorImage, TileError>)>,
}

impl TileCache {
    pub fn new(ctx: &egui::Context, runtime: Handle, url_template: &str) -> Self {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|err| {
                log::warn!("Falling back to default tile client: {err}");
                Client::new()
            });
        let (loaded_sender, loaded_receiver) = mpsc::unbounded_channel();

        Self {
            ctx: ctx.clone(),
            runtime,
            client,
            url_template: url_template.to_string(),
            slots: TileSlots::new(MAX_TILES),
            loaded_sender,
            loaded_receiver,
        }
    }

    /// Texture for `id` if it is loaded; starts a download the first time a
    /// tile is asked for. Failed tiles stay blank.
    pub fn texture(&mut self, id: TileId) -> Option<egui::TextureId> {
        match self.slots.touch(id) {
            Some(TileSlot::Ready(handle)) => Some(handle.id()),
            Some(TileSlot::Loading | TileSlot::Failed) => None,
            None => {
                self.request(id);
                None
            }
        }
    }

    /// Uploads finished downloads and trims the cache; call once per frame
    /// before painting.
    pub fn poll(&mut self) {
        self.slots.evict();
        self.slots.tick();

        while let Ok((id, result)) = self.loaded_receiver.try_recv() {
            if !self.slots.is_loading(id) {
                continue;
            }
            let texture = match result {
                Ok(image) => {
                    let name = format!("tile-{}-{}-{}", id.zoom, id.x, id.y);
                    Some(self.ctx.load_texture(name, image, egui::TextureOptions::LINEAR))
                }
                Err(err) => {
                    log::warn!("Tile {}/{}/{} unavailable: {err}", id.zoom, id.x, id.y);
                    None
                }
            };
            self.slots.finish(id, texture);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn request(&mut self, id: TileId) {
        self.slots.start_loading(id);

        let client = self.client.clone();
        let url = id.url(&self.url_template);
        let sender = self.loaded_sender.clone();
        let ctx = self.ctx.clone();

        self.runtime.spawn(async move {
            let result = fetch_tile(&client, &url).await;
            if sender.send((id, result)).is_ok() {
                ctx.request_repaint();
            }
        });
    }
}

async fn fetch_tile(client: &Client, url: &str) -> Result<egui::ColorImage, TileError> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(TileError::Status(response.status()));
    }
    let bytes = response.bytes().await?;
    decode_tile(&bytes)
}

pub fn decode_tile(bytes: &[u8]) -> Result<egui::ColorImage, TileError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}
