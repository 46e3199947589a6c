// Projects circuit geometry into a padded, y-down drawing space

use super::types::CircuitGeometry;

/// Padding added on every side of the track bounds, covering stroke width and
/// corner marker radius
pub const TRACK_PADDING: f64 = 80.0;
/// View box width used when the geometry has no usable extent
pub const FALLBACK_WIDTH: f64 = 400.0;
/// View box height used when the geometry has no usable extent
pub const FALLBACK_HEIGHT: f64 = 300.0;

/// Represents a 2D coordinate point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point with the y axis flipped from y-up source coordinates to y-down
    pub fn flipped(x: f64, y: f64) -> Self {
        // 0.0 - y keeps a zero coordinate positive
        Self { x, y: 0.0 - y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Bounding box for coordinate calculations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn update(&mut self, point: Point2D) {
        self.min_x = self.min_x.min(point.x);
        self.max_x = self.max_x.max(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// View box covering this box plus `padding` on every side. Unusable
    /// dimensions fall back to [`FALLBACK_WIDTH`] x [`FALLBACK_HEIGHT`].
    pub fn padded_view_box(&self, padding: f64) -> ViewBox {
        let width = self.width() + 2.0 * padding;
        let height = self.height() + 2.0 * padding;
        ViewBox {
            min_x: self.min_x - padding,
            min_y: self.min_y - padding,
            width: usable_extent(width).unwrap_or(FALLBACK_WIDTH),
            height: usable_extent(height).unwrap_or(FALLBACK_HEIGHT),
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

fn usable_extent(extent: f64) -> Option<f64> {
    (extent.is_finite() && extent > 0.0).then_some(extent)
}

/// Visible region of the drawing space, in SVG `viewBox` order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Uniform scale and centring offset that fit this view box inside a
    /// `width` x `height` viewport, like `preserveAspectRatio="xMidYMid meet"`
    pub fn fit(&self, width: f64, height: f64) -> ViewportFit {
        let scale = (width / self.width).min(height / self.height);
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        ViewportFit {
            scale,
            offset_x: (width - self.width * scale) / 2.0 - self.min_x * scale,
            offset_y: (height - self.height * scale) / 2.0 - self.min_y * scale,
        }
    }
}

impl std::fmt::Display for ViewBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.min_x, self.min_y, self.width, self.height
        )
    }
}

/// Mapping from view box coordinates to viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportFit {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ViewportFit {
    pub fn apply(&self, point: Point2D) -> Point2D {
        Point2D::new(
            point.x * self.scale + self.offset_x,
            point.y * self.scale + self.offset_y,
        )
    }
}

/// A corner marker placed in the drawing space
#[derive(Debug, Clone, PartialEq)]
pub struct SceneMarker {
    pub position: Point2D,
    pub label: String,
}

/// Everything needed to draw a circuit
#[derive(Debug, Clone, PartialEq)]
pub struct TrackScene {
    pub view_box: ViewBox,
    /// Track outline in drawing order, empty when the circuit has no outline
    pub polyline: Vec<Point2D>,
    pub markers: Vec<SceneMarker>,
    /// Heading text, `Circuit` when the location is unknown
    pub title: String,
}

impl TrackScene {
    pub fn has_polyline(&self) -> bool {
        !self.polyline.is_empty()
    }
}

/// Result of projecting a circuit
#[derive(Debug, Clone, PartialEq)]
pub enum TrackProjection {
    /// Nothing to draw: the fetch failed or the circuit has no published geometry
    NoData,
    Scene(TrackScene),
}

impl TrackProjection {
    pub fn scene(&self) -> Option<&TrackScene> {
        match self {
            TrackProjection::NoData => None,
            TrackProjection::Scene(scene) => Some(scene),
        }
    }
}

/// Project a fetched circuit into drawable shapes.
///
/// A missing circuit, a circuit carrying a backend error, or one without track
/// and corners yields [`TrackProjection::NoData`]. Otherwise all points are
/// flipped to y-down, bounded, and padded by [`TRACK_PADDING`].
pub fn project(circuit: Option<&CircuitGeometry>) -> TrackProjection {
    let Some(circuit) = circuit else {
        return TrackProjection::NoData;
    };
    if circuit.error.is_some() || circuit.is_empty() {
        return TrackProjection::NoData;
    }

    let polyline: Vec<Point2D> = circuit
        .track
        .iter()
        .map(|[x, y]| Point2D::flipped(*x, *y))
        .collect();
    let markers: Vec<SceneMarker> = circuit
        .corners
        .iter()
        .map(|corner| SceneMarker {
            position: Point2D::flipped(corner.x, corner.y),
            label: corner.label(),
        })
        .collect();

    let mut bbox = BoundingBox::new();
    for point in polyline
        .iter()
        .copied()
        .chain(markers.iter().map(|m| m.position))
    {
        bbox.update(point);
    }

    TrackProjection::Scene(TrackScene {
        view_box: bbox.padded_view_box(TRACK_PADDING),
        polyline,
        markers,
        title: circuit.display_name().to_string(),
    })
}
