use egui::{Color32, Frame, RichText, Sense, Stroke};

use super::{DashboardApp, PALETTE_PANEL, PALETTE_RED};

const CARD_WIDTH: f32 = 180.0;

impl DashboardApp {
    /// Driver cards. Clicking a card shows that driver's laps.
    pub(crate) fn driver_list(&mut self, ui: &mut egui::Ui) {
        if self.state.drivers.is_empty() {
            ui.label(RichText::new("No drivers found").color(Color32::GRAY));
            return;
        }

        let mut clicked: Option<String> = None;
        ui.horizontal(|ui| {
            ui.heading("Drivers");
            if self.state.driver_filter.is_some() && ui.button("All drivers").clicked() {
                self.filter_driver(None);
            }
        });
        ui.add_space(6.0);

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for driver in &self.state.drivers {
                    let selected =
                        self.state.driver_filter.as_deref() == Some(driver.abbreviation.as_str());
                    let stroke = if selected {
                        Stroke::new(2.0, PALETTE_RED)
                    } else {
                        Stroke::new(1.0, Color32::from_gray(60))
                    };
                    let card = Frame::new()
                        .fill(PALETTE_PANEL)
                        .stroke(stroke)
                        .corner_radius(6)
                        .inner_margin(8)
                        .show(ui, |ui| {
                            ui.set_width(CARD_WIDTH);
                            ui.horizontal(|ui| {
                                let number = driver
                                    .number
                                    .map(|n| n.to_string())
                                    .unwrap_or_default();
                                ui.label(RichText::new(number).size(22.0).color(PALETTE_RED).strong());
                                ui.vertical(|ui| {
                                    ui.label(RichText::new(driver.abbreviation.as_str()).strong());
                                    ui.label(driver.name.as_str());
                                    ui.label(RichText::new(driver.team.as_str()).small().color(Color32::GRAY));
                                });
                            });
                        });
                    if card.response.interact(Sense::click()).clicked() {
                        clicked = Some(driver.abbreviation.clone());
                    }
                }
            });
        });

        if let Some(driver) = clicked {
            self.filter_driver(Some(driver));
        }
    }
}
