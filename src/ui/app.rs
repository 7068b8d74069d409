use std::time::Duration;

use eframe::egui;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::common::{BoardEvent, StoreCommand};
use crate::config::AppConfig;
use crate::map::MapView;
use crate::network::TileCache;

use super::components::composer_panel::{self, ComposerAction};
use super::components::map_canvas::{Layers, MapAction, MapCanvas};
use super::components::{message_list, status_banner};
use super::state::BoardState;

// Background events still need a frame to be drained when the user is idle.
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(200);

pub struct BoardApp {
    state: BoardState,
    canvas: MapCanvas,
    attribution: String,
    command_sender: mpsc::Sender<StoreCommand>,
    event_receiver: mpsc::Receiver<BoardEvent>,
}

impl BoardApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: Handle,
        config: &AppConfig,
        command_sender: mpsc::Sender<StoreCommand>,
        event_receiver: mpsc::Receiver<BoardEvent>,
    ) -> Self {
        let tiles = TileCache::new(&cc.egui_ctx, runtime, &config.tile_url);
        let mut app = Self {
            state: BoardState::new(MapView::new(config.fallback_center, config.initial_zoom)),
            canvas: MapCanvas::new(tiles),
            attribution: config.attribution.clone(),
            command_sender,
            event_receiver,
        };
        app.send_command(StoreCommand::ListMessages);
        app
    }

    fn handle_background_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            if let Some(command) = self.state.apply(event) {
                self.send_command(command);
            }
        }
    }

    fn send_command(&mut self, command: StoreCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to store gateway: {err}");
        }
    }

    fn show_map(&mut self, ui: &mut egui::Ui) {
        let layers = Layers {
            messages: &self.state.messages,
            pending: self.state.pending(),
            selected: self.state.selected_message(),
            attribution: &self.attribution,
        };

        let mut view = self.state.view;
        let action = self.canvas.show(ui, &mut view, &layers);
        self.state.view = view;

        match action {
            Some(MapAction::Clicked(at)) => self.state.click(at),
            Some(MapAction::MarkerClicked(id)) => self.state.select_marker(&id),
            None => {}
        }
    }
}

impl eframe::App for BoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_background_events();
        ctx.request_repaint_after(EVENT_POLL_INTERVAL);

        if self.state.locating {
            egui::CentralPanel::default().show(ctx, status_banner::render_loading);
            return;
        }

        egui::SidePanel::right("message_list")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                let selected = self.state.selected_message().map(|message| message.id.clone());
                if let Some(id) = message_list::render(ui, &self.state.messages, selected.as_deref()) {
                    if let Some(message) = self.state.messages.iter().find(|message| message.id == id) {
                        self.state.view.center = message.position();
                    }
                    self.state.select_marker(&id);
                }
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.show_map(ui));

        if let Some(notice) = self.state.notice {
            status_banner::render(ctx, notice);
        }

        if let Some(at) = self.state.pending() {
            match composer_panel::render(ctx, at, &mut self.state.composer) {
                Some(ComposerAction::Submit) => {
                    if let Some(command) = self.state.submit() {
                        self.send_command(command);
                    }
                }
                Some(ComposerAction::Cancel) => self.state.cancel(),
                None => {}
            }
        }
    }
}
