// Circuit geometry as served by the backend

use serde::{Deserialize, Serialize};

/// Outline and corner markers of a circuit. Coordinates are y-up.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct CircuitGeometry {
    /// Track outline in drawing order
    pub track: Vec<[f64; 2]>,
    /// Numbered corner markers
    pub corners: Vec<CornerMarker>,
    /// Display name of the circuit location
    pub location: Option<String>,
    /// Error reported by the backend instead of geometry
    pub error: Option<String>,
}

impl CircuitGeometry {
    /// True when there is neither an outline nor any corner to draw
    pub fn is_empty(&self) -> bool {
        self.track.is_empty() && self.corners.is_empty()
    }

    /// Location for headings, `Circuit` when unknown
    pub fn display_name(&self) -> &str {
        match self.location.as_deref() {
            Some(location) if !location.is_empty() => location,
            _ => "Circuit",
        }
    }
}

/// A labelled turn on the circuit
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct CornerMarker {
    /// Corner index
    pub number: u32,
    /// Optional sub-corner suffix, e.g. "a" for turn 3a
    pub letter: Option<String>,
    pub x: f64,
    pub y: f64,
    /// Heading of the corner marker in degrees, not used for projection
    pub angle: Option<f64>,
}

impl CornerMarker {
    pub fn new(number: u32, x: f64, y: f64) -> Self {
        Self {
            number,
            x,
            y,
            ..Default::default()
        }
    }

    pub fn with_letter(mut self, letter: impl Into<String>) -> Self {
        self.letter = Some(letter.into());
        self
    }

    /// Corner number followed by its letter suffix, e.g. "3a"
    pub fn label(&self) -> String {
        format!("{}{}", self.number, self.letter.as_deref().unwrap_or(""))
    }
}
