use egui::{Color32, RichText};
use egui_extras::{Column, TableBuilder};

use f1lab::timing::{LapSortKey, ResultSortKey, SortState, lap_time_cell};

use super::{DashboardApp, PALETTE_GOLD, PALETTE_GREEN, PALETTE_PURPLE};

const ROW_HEIGHT: f32 = 20.0;
const HEADER_HEIGHT: f32 = 24.0;

/// Header button for a sortable column, returns true when clicked
fn sort_header<K: Copy + PartialEq>(ui: &mut egui::Ui, label: &str, key: K, sort: &SortState<K>) -> bool {
    let text = if sort.key == key {
        format!("{} {}", label, sort.direction.arrow())
    } else {
        label.to_string()
    };
    ui.button(RichText::new(text).strong()).clicked()
}

impl DashboardApp {
    pub(crate) fn lap_table(&mut self, ui: &mut egui::Ui) {
        let laps = self.state.sorted_laps();
        if laps.is_empty() {
            ui.label(RichText::new("No lap data available").color(Color32::GRAY));
            return;
        }

        ui.horizontal(|ui| {
            ui.heading("Lap Data");
            if let Some(driver) = self.state.driver_filter.clone() {
                ui.label(RichText::new(format!("({})", driver)).color(Color32::GRAY));
                if ui.button("All drivers").clicked() {
                    self.filter_driver(None);
                }
            }
        });

        let sort = self.state.lap_sort;
        let mut clicked: Option<LapSortKey> = None;
        TableBuilder::new(ui)
            .id_salt("laps")
            .striped(true)
            .resizable(true)
            .column(Column::auto().at_least(60.0))
            .columns(Column::auto().at_least(80.0), 5)
            .columns(Column::auto().at_least(70.0), 3)
            .header(HEADER_HEIGHT, |mut header| {
                for key in [
                    LapSortKey::Driver,
                    LapSortKey::LapNumber,
                    LapSortKey::LapTime,
                    LapSortKey::Sector1,
                    LapSortKey::Sector2,
                    LapSortKey::Sector3,
                ] {
                    header.col(|ui| {
                        if sort_header(ui, key.label(), key, &sort) {
                            clicked = Some(key);
                        }
                    });
                }
                for label in ["Compound", "Tyre Life", "Flags"] {
                    header.col(|ui| {
                        ui.strong(label);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, laps.len(), |mut row| {
                    let lap = &laps[row.index()];
                    let row_color = lap.is_fastest.then_some(PALETTE_PURPLE);
                    let cell = |text: String| match row_color {
                        Some(color) => RichText::new(text).color(color),
                        None => RichText::new(text),
                    };

                    row.col(|ui| {
                        ui.label(cell(lap.driver.clone()).strong());
                    });
                    row.col(|ui| {
                        ui.label(cell(lap.lap_number.to_string()));
                    });
                    row.col(|ui| {
                        let time = cell(lap_time_cell(lap.lap_time.as_deref()));
                        if lap.is_personal_best && !lap.is_fastest {
                            ui.label(time.color(PALETTE_GREEN));
                        } else {
                            ui.label(time);
                        }
                    });
                    for sector in [&lap.sector_1_time, &lap.sector_2_time, &lap.sector_3_time] {
                        row.col(|ui| {
                            ui.label(cell(lap_time_cell(sector.as_deref())));
                        });
                    }
                    row.col(|ui| {
                        let compound = lap
                            .compound
                            .clone()
                            .filter(|c| !c.is_empty())
                            .unwrap_or_else(|| "-".to_string());
                        ui.label(cell(compound));
                    });
                    row.col(|ui| {
                        let tyre_life = match lap.tyre_life {
                            Some(life) if life > 0 => life.to_string(),
                            _ => "-".to_string(),
                        };
                        ui.label(cell(tyre_life));
                    });
                    row.col(|ui| {
                        if lap.is_personal_best {
                            ui.label(RichText::new("PB").color(PALETTE_GREEN).strong());
                        }
                        if lap.is_fastest {
                            ui.label(RichText::new("F").color(PALETTE_PURPLE).strong());
                        }
                    });
                });
            });

        if let Some(key) = clicked {
            self.state = self.state.sort_laps(key);
        }
    }

    pub(crate) fn results_table(&mut self, ui: &mut egui::Ui) {
        let results = self.state.sorted_results();
        if results.is_empty() {
            ui.label(RichText::new("No results available").color(Color32::GRAY));
            return;
        }
        ui.heading("Session Results");

        let sort = self.state.result_sort;
        let mut clicked: Option<ResultSortKey> = None;
        TableBuilder::new(ui)
            .id_salt("results")
            .striped(true)
            .resizable(true)
            .column(Column::auto().at_least(50.0))
            .column(Column::auto().at_least(60.0))
            .columns(Column::auto().at_least(140.0), 2)
            .columns(Column::auto().at_least(80.0), 4)
            .column(Column::auto().at_least(60.0))
            .column(Column::remainder())
            .header(HEADER_HEIGHT, |mut header| {
                for key in ResultSortKey::ALL {
                    header.col(|ui| {
                        if sort_header(ui, key.label(), key, &sort) {
                            clicked = Some(key);
                        }
                    });
                }
                header.col(|ui| {
                    ui.strong("Status");
                });
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, results.len(), |mut row| {
                    let index = row.index();
                    let result = &results[index];
                    let cell = |text: String| {
                        if result.is_winner() {
                            RichText::new(text).color(PALETTE_GOLD)
                        } else {
                            RichText::new(text)
                        }
                    };

                    row.col(|ui| {
                        let position = result.position.map(|p| p as usize).unwrap_or(index + 1);
                        ui.label(cell(position.to_string()).strong());
                    });
                    row.col(|ui| {
                        ui.label(cell(result.abbreviation.clone()).strong());
                    });
                    row.col(|ui| {
                        ui.label(cell(result.name.clone()));
                    });
                    row.col(|ui| {
                        ui.label(cell(result.team.clone()));
                    });
                    for time in [&result.q1, &result.q2, &result.q3, &result.best_lap_time] {
                        row.col(|ui| {
                            ui.label(cell(lap_time_cell(time.as_deref())));
                        });
                    }
                    row.col(|ui| {
                        ui.label(cell(result.points_cell()));
                    });
                    row.col(|ui| {
                        ui.label(cell(result.status_cell().to_string()));
                    });
                });
            });

        if let Some(key) = clicked {
            self.state = self.state.sort_results(key);
        }
    }
}
