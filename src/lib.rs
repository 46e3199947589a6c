// Library interface for f1lab
// This allows integration tests to access internal modules

pub mod api;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod session;
pub mod timing;
pub mod track_map;
pub mod writer;

// Re-export commonly used types
pub use api::{HttpSessionSource, SessionDataSource};
pub use config::AppConfig;
pub use dashboard::{DashboardState, FetchOutcome, FetchRequest, Fetcher, Tab};
pub use errors::F1LabError;
pub use session::{Driver, Lap, LapList, ResultRow, SessionInfo, SessionKey, SessionType};
pub use track_map::{CircuitGeometry, TrackMapGenerator, TrackProjection, project};
