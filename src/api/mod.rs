// Access to the FastF1 session data backend

pub mod http;

use crate::errors::F1LabError;
use crate::session::{Driver, LapList, ResultRow, SessionInfo, SessionKey};
use crate::track_map::CircuitGeometry;

pub use http::HttpSessionSource;

/// Source of session data, one call per backend endpoint
pub trait SessionDataSource: Send + Sync {
    /// Basic session metadata
    fn session_info(&self, key: &SessionKey) -> Result<SessionInfo, F1LabError>;

    /// Drivers taking part in the session
    fn drivers(&self, key: &SessionKey) -> Result<Vec<Driver>, F1LabError>;

    /// Laps of the session, optionally only those of one driver
    fn laps(&self, key: &SessionKey, driver: Option<&str>) -> Result<LapList, F1LabError>;

    /// Classification of the session
    fn results(&self, key: &SessionKey) -> Result<Vec<ResultRow>, F1LabError>;

    /// Track outline and corner markers of the event's circuit
    fn circuit(&self, key: &SessionKey) -> Result<CircuitGeometry, F1LabError>;
}
