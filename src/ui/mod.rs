mod driver_list;
mod session_selector;
mod tables;
mod track_map_view;

use std::sync::{
    Arc,
    mpsc::{self, Receiver},
};

use egui::{Color32, Frame, RichText, Visuals, style::Widgets};
use log::{debug, error};

use f1lab::{
    AppConfig, DashboardState, FetchOutcome, Fetcher, SessionDataSource, SessionKey, Tab,
    TrackMapGenerator,
};

pub(crate) const PALETTE_BLACK: Color32 = Color32::from_rgb(21, 21, 30);
pub(crate) const PALETTE_PANEL: Color32 = Color32::from_rgb(31, 31, 39);
pub(crate) const PALETTE_RED: Color32 = Color32::from_rgb(225, 6, 0);
pub(crate) const PALETTE_PURPLE: Color32 = Color32::from_rgb(168, 85, 247);
pub(crate) const PALETTE_GREEN: Color32 = Color32::from_rgb(34, 197, 94);
pub(crate) const PALETTE_GOLD: Color32 = Color32::from_rgb(255, 215, 0);

/// Native dashboard for browsing one session at a time
pub struct DashboardApp {
    state: DashboardState,
    outcomes: Receiver<FetchOutcome>,
    fetcher: Fetcher,
    app_config: AppConfig,
    /// Values currently picked in the session selector, not yet loaded
    selection: SessionKey,
    svg_generator: TrackMapGenerator,
    export_status: Option<String>,
}

impl DashboardApp {
    pub fn new(
        source: Arc<dyn SessionDataSource>,
        app_config: AppConfig,
        initial_session: SessionKey,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        let default_visuals = Visuals {
            dark_mode: true,
            hyperlink_color: PALETTE_RED,
            faint_bg_color: PALETTE_PANEL,
            extreme_bg_color: PALETTE_BLACK,
            panel_fill: PALETTE_BLACK,
            window_fill: PALETTE_PANEL,
            button_frame: true,
            widgets: Widgets::dark(),
            striped: true,
            ..Default::default()
        };
        cc.egui_ctx.set_visuals(default_visuals);

        let (outcome_tx, outcome_rx) = mpsc::channel::<FetchOutcome>();
        let repaint_ctx = cc.egui_ctx.clone();
        let fetcher = Fetcher::new(source, outcome_tx, Arc::new(move || repaint_ctx.request_repaint()));

        let mut app = Self {
            state: DashboardState::new(),
            outcomes: outcome_rx,
            fetcher,
            app_config,
            selection: initial_session.clone(),
            svg_generator: TrackMapGenerator::new(),
            export_status: None,
        };
        app.load_session(initial_session);
        app
    }

    fn load_session(&mut self, key: SessionKey) {
        debug!("Selecting session {}", key);
        let (next, requests) = self.state.select_session(key);
        self.state = next;
        self.export_status = None;
        self.fetcher.dispatch_all(requests);
    }

    fn filter_driver(&mut self, driver: Option<String>) {
        if let Some((next, request)) = self.state.filter_laps(driver) {
            self.state = next;
            self.fetcher.dispatch(request);
        }
    }

    fn header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(RichText::new("F1 Performance Lab").color(PALETTE_RED).strong());
            ui.label(RichText::new("Explore Formula 1 session data").color(Color32::GRAY));
        });
        ui.add_space(4.0);
        self.session_selector(ui);
    }

    fn error_banner(&self, ui: &mut egui::Ui, message: &str) {
        Frame::new()
            .fill(Color32::from_rgb(60, 16, 16))
            .corner_radius(4)
            .inner_margin(8)
            .show(ui, |ui| {
                ui.label(RichText::new(format!("Error: {}", message)).color(Color32::LIGHT_RED));
                ui.label(
                    RichText::new(format!(
                        "Make sure the backend server is running at {}",
                        self.app_config.api_url
                    ))
                    .color(Color32::GRAY)
                    .small(),
                );
            });
    }

    fn tab_bar(&mut self, ui: &mut egui::Ui) {
        let tabs = [
            (Tab::Drivers, format!("Drivers ({})", self.state.drivers.len())),
            (Tab::Laps, format!("Laps ({})", self.state.laps.total())),
            (Tab::Results, format!("Results ({})", self.state.results.len())),
            (Tab::TrackMap, "Track Map".to_string()),
        ];
        ui.horizontal(|ui| {
            for (tab, label) in tabs {
                if ui
                    .selectable_label(self.state.active_tab == tab, label)
                    .clicked()
                {
                    self.state = self.state.select_tab(tab);
                }
            }
        });
    }

    fn session_content(&mut self, ui: &mut egui::Ui) {
        if let Some(title) = self.state.title() {
            ui.heading(title);
        }
        self.tab_bar(ui);
        ui.separator();

        // the track map has its own loading indicator
        if self.state.is_loading() && self.state.active_tab != Tab::TrackMap {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading...");
            });
            return;
        }

        match self.state.active_tab {
            Tab::Drivers => self.driver_list(ui),
            Tab::Laps => self.lap_table(ui),
            Tab::Results => self.results_table(ui),
            Tab::TrackMap => self.track_map_view(ui),
        }
    }
}

impl eframe::App for DashboardApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(session) = &self.state.session {
            self.app_config.remember_session(session);
        }
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.state = self.state.apply(outcome);
        }

        egui::TopBottomPanel::top("session_selector")
            .frame(Frame::new().fill(PALETTE_PANEL).inner_margin(8))
            .show(ctx, |ui| self.header(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(message) = self.state.error.clone() {
                self.error_banner(ui, &message);
                return;
            }
            if self.state.session.is_some() {
                self.session_content(ui);
            }
        });
    }
}
