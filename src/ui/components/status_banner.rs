use eframe::egui;

pub fn render(ctx: &egui::Context, notice: &str) {
    egui::Area::new(egui::Id::new("location_notice"))
        .anchor(egui::Align2::LEFT_BOTTOM, [16.0, -32.0])
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::from_rgb(239, 68, 68))
                .corner_radius(8.0)
                .inner_margin(12.0)
                .show(ui, |ui| {
                    ui.set_max_width(360.0);
                    ui.colored_label(egui::Color32::WHITE, notice);
                });
        });
}

pub fn render_loading(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.label("讀取位置中(Check location...)");
    });
}
