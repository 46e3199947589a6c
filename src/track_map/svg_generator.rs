// SVG track map generator for projected circuit scenes

use std::fmt::Write as _;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::projector::{Point2D, TrackScene};
use crate::errors::F1LabError;

/// Configuration for SVG track map generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackMapConfig {
    /// Stroke width for the track line, in view box units
    pub stroke_width: f64,
    /// Radius of the corner marker circles
    pub marker_radius: f64,
    pub label_font_size: f64,
    pub track_color: String,
    pub marker_fill: String,
    pub marker_stroke: String,
    pub label_color: String,
}

impl Default for TrackMapConfig {
    fn default() -> Self {
        Self {
            stroke_width: 12.0,
            marker_radius: 40.0,
            label_font_size: 14.0,
            track_color: "#ff4444".to_string(),
            marker_fill: "#ffffff".to_string(),
            marker_stroke: "#e10600".to_string(),
            label_color: "#e0e0e0".to_string(),
        }
    }
}

/// Generator for creating SVG track maps from projected scenes
pub struct TrackMapGenerator {
    config: TrackMapConfig,
}

impl TrackMapGenerator {
    /// Create a new track map generator with default configuration
    pub fn new() -> Self {
        Self {
            config: TrackMapConfig::default(),
        }
    }

    /// Render `scene` as a standalone SVG document.
    ///
    /// The document uses the scene's view box with `xMidYMid meet` scaling, draws
    /// the outline as a polyline and one labelled circle per corner. Fails only
    /// when a coordinate is not finite.
    pub fn generate_svg(&self, scene: &TrackScene) -> Result<String, F1LabError> {
        let view_box = scene.view_box;
        if ![view_box.min_x, view_box.min_y, view_box.width, view_box.height]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(F1LabError::SvgGenerationError {
                reason: format!("View box has non-finite bounds: {view_box}"),
            });
        }
        if let Some(index) = scene.polyline.iter().position(|p| !p.is_finite()) {
            return Err(F1LabError::SvgGenerationError {
                reason: format!("Track point {index} has non-finite coordinates"),
            });
        }
        if let Some(marker) = scene.markers.iter().find(|m| !m.position.is_finite()) {
            return Err(F1LabError::SvgGenerationError {
                reason: format!("Corner {} has non-finite coordinates", marker.label),
            });
        }

        debug!(
            "Generating SVG for {} track points and {} corners",
            scene.polyline.len(),
            scene.markers.len()
        );

        // Pre-allocate capacity
        let mut svg = String::with_capacity(512 + scene.polyline.len() * 24 + scene.markers.len() * 256);

        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{}" preserveAspectRatio="xMidYMid meet">
  <title>Track Map — {}</title>"#,
            view_box,
            escape_xml(&scene.title)
        );

        if scene.has_polyline() {
            let _ = write!(
                svg,
                "\n  <polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\" />",
                polyline_points(&scene.polyline),
                self.config.track_color,
                self.config.stroke_width
            );
        }

        for marker in &scene.markers {
            let _ = write!(
                svg,
                r#"
  <g>
    <circle cx="{x}" cy="{y}" r="{r}" fill="{fill}" stroke="{stroke}" stroke-width="2" />
    <text x="{x}" y="{y}" text-anchor="middle" dominant-baseline="central" fill="{label}" font-size="{size}" font-weight="bold">{text}</text>
  </g>"#,
                x = marker.position.x,
                y = marker.position.y,
                r = self.config.marker_radius,
                fill = self.config.marker_fill,
                stroke = self.config.marker_stroke,
                label = self.config.label_color,
                size = self.config.label_font_size,
                text = escape_xml(&marker.label)
            );
        }

        svg.push_str("\n</svg>\n");

        info!("Generated track map SVG with {} characters", svg.len());
        Ok(svg)
    }

    /// Update generator configuration
    pub fn set_config(&mut self, config: TrackMapConfig) {
        self.config = config;
    }

    /// Get current configuration
    pub fn config(&self) -> &TrackMapConfig {
        &self.config
    }
}

impl Default for TrackMapGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// `points` attribute value: space separated `x,y` pairs
fn polyline_points(points: &[Point2D]) -> String {
    let mut out = String::with_capacity(points.len() * 24);
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{},{}", point.x, point.y);
    }
    out
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
