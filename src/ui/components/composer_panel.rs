use eframe::egui;

use crate::common::Coordinates;
use crate::ui::composer::Composer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerAction {
    Submit,
    Cancel,
}

pub fn render(ctx: &egui::Context, at: Coordinates, composer: &mut Composer) -> Option<ComposerAction> {
    let mut action = None;

    egui::Window::new("留言 Leave a message")
        .anchor(egui::Align2::LEFT_TOP, [16.0, 16.0])
        .collapsible(false)
        .resizable(false)
        .default_width(300.0)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("📍 {:.4}, {:.4}", at.lat, at.lng)).weak());

            ui.add(
                egui::TextEdit::singleline(&mut composer.display_name)
                    .hint_text("顯示名稱（可留空） Display name (optional)")
                    .desired_width(f32::INFINITY),
            );
            ui.add(
                egui::TextEdit::multiline(&mut composer.message)
                    .hint_text("想說什麼？ What do you want to say?")
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );

            ui.horizontal(|ui| {
                if ui.button("取消 Cancel").clicked() {
                    action = Some(ComposerAction::Cancel);
                }
                if ui.button("傳送 Send").clicked() {
                    action = Some(ComposerAction::Submit);
                }
            });
        });

    action
}
