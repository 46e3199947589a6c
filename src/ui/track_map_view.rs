use egui::{Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Vec2};
use log::error;

use f1lab::dashboard::CircuitSlice;
use f1lab::track_map::{Point2D, TrackProjection, TrackScene};
use f1lab::writer;

use super::{DashboardApp, PALETTE_PANEL, PALETTE_RED};

const MIN_CANVAS_HEIGHT: f32 = 320.0;
/// Sizes in view box units, scaled with the track
const TRACK_STROKE: f64 = 12.0;
const MARKER_RADIUS: f64 = 40.0;
const LABEL_SIZE: f64 = 28.0;

impl DashboardApp {
    pub(crate) fn track_map_view(&mut self, ui: &mut egui::Ui) {
        if self.state.is_circuit_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading track map...");
            });
            return;
        }

        let scene = match (&self.state.circuit, self.state.circuit.projection()) {
            (CircuitSlice::Failed(reason), _) => {
                ui.label(RichText::new("Could not load track map").color(Color32::LIGHT_RED));
                ui.label(RichText::new(reason.as_str()).small().color(Color32::GRAY));
                return;
            }
            (_, TrackProjection::NoData) => {
                ui.label(RichText::new("No track data available").color(Color32::GRAY));
                return;
            }
            (_, TrackProjection::Scene(scene)) => scene,
        };

        ui.horizontal(|ui| {
            ui.heading(format!("Track Map — {}", scene.title));
            if ui.button("Export SVG").clicked() {
                self.export_svg(&scene);
            }
            if let Some(status) = &self.export_status {
                ui.label(RichText::new(status.as_str()).small().color(Color32::GRAY));
            }
        });

        let size = Vec2::new(
            ui.available_width(),
            ui.available_height().max(MIN_CANVAS_HEIGHT),
        );
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let rect = response.rect;
        painter.rect_filled(rect, 8.0, PALETTE_PANEL);

        let fit = scene.view_box.fit(rect.width() as f64, rect.height() as f64);
        let to_screen = |point: Point2D| {
            let fitted = fit.apply(point);
            Pos2::new(rect.min.x + fitted.x as f32, rect.min.y + fitted.y as f32)
        };
        let scaled = |size: f64| (size * fit.scale) as f32;

        if scene.has_polyline() {
            let points: Vec<Pos2> = scene.polyline.iter().map(|p| to_screen(*p)).collect();
            painter.add(Shape::line(
                points,
                Stroke::new(scaled(TRACK_STROKE).max(1.0), PALETTE_RED),
            ));
        }

        for marker in &scene.markers {
            let center = to_screen(marker.position);
            painter.circle(
                center,
                scaled(MARKER_RADIUS).max(4.0),
                Color32::WHITE,
                Stroke::new(2.0, PALETTE_RED),
            );
            painter.text(
                center,
                Align2::CENTER_CENTER,
                &marker.label,
                FontId::proportional(scaled(LABEL_SIZE).max(8.0)),
                Color32::BLACK,
            );
        }
    }

    fn export_svg(&mut self, scene: &TrackScene) {
        let file_name = format!("{}.svg", scene.title.replace(' ', "_"));
        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG", &["svg"])
            .set_file_name(file_name)
            .save_file()
        else {
            return;
        };

        let written = self
            .svg_generator
            .generate_svg(scene)
            .and_then(|svg| writer::write_svg(&path, &svg));
        self.export_status = Some(match written {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => {
                error!("Could not export track map: {}", e);
                e.to_string()
            }
        });
    }
}
