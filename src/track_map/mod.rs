// Track map support: circuit geometry, projection into drawing space and SVG output

pub mod projector;
pub mod svg_generator;
pub mod types;

// Re-export commonly used types
pub use projector::{
    BoundingBox, FALLBACK_HEIGHT, FALLBACK_WIDTH, Point2D, SceneMarker, TRACK_PADDING,
    TrackProjection, TrackScene, ViewBox, ViewportFit, project,
};
pub use svg_generator::{TrackMapConfig, TrackMapGenerator};
pub use types::{CircuitGeometry, CornerMarker};
