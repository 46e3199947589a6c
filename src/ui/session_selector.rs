use egui::{Button, ComboBox, DragValue};

use f1lab::session::{EVENTS, FIRST_YEAR, LAST_YEAR, SessionType};

use super::DashboardApp;

impl DashboardApp {
    pub(crate) fn session_selector(&mut self, ui: &mut egui::Ui) {
        let loading = self.state.is_loading();
        let mut load_requested = false;

        ui.horizontal_wrapped(|ui| {
            ui.label("Year");
            ui.add(DragValue::new(&mut self.selection.year).range(FIRST_YEAR..=LAST_YEAR));

            ui.label("Event");
            ComboBox::from_id_salt("event")
                .selected_text(self.selection.event.clone())
                .width(180.0)
                .show_ui(ui, |ui| {
                    for event in EVENTS {
                        ui.selectable_value(&mut self.selection.event, event.to_string(), event);
                    }
                });

            ui.label("Session");
            ComboBox::from_id_salt("session_type")
                .selected_text(self.selection.session_type.label())
                .show_ui(ui, |ui| {
                    for session_type in SessionType::ALL {
                        ui.selectable_value(
                            &mut self.selection.session_type,
                            session_type,
                            session_type.label(),
                        );
                    }
                });

            let label = if loading { "Loading..." } else { "Load Session" };
            if ui.add_enabled(!loading, Button::new(label)).clicked() {
                load_requested = true;
            }
        });

        if load_requested {
            self.load_session(self.selection.clone());
        }
    }
}
