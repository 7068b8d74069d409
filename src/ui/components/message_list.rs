use eframe::egui;

use crate::common::Message;

/// Newest-first list of every message; returns the id of a clicked entry.
pub fn render(ui: &mut egui::Ui, messages: &[Message], selected: Option<&str>) -> Option<String> {
    ui.heading("Messages");
    ui.separator();

    if messages.is_empty() {
        ui.label("No messages yet. Click the map to leave one!");
        return None;
    }

    let mut clicked = None;
    egui::ScrollArea::vertical().show(ui, |ui| {
        for message in messages {
            let is_selected = selected == Some(message.id.as_str());
            let response = ui.selectable_label(
                is_selected,
                egui::RichText::new(message.author()).strong(),
            );
            ui.label(&message.message);
            ui.label(
                egui::RichText::new(
                    message
                        .created_at
                        .with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string(),
                )
                .small()
                .weak(),
            );
            ui.separator();

            if response.clicked() {
                clicked = Some(message.id.clone());
            }
        }
    });

    clicked
}
