// Session records as served by the FastF1 backend

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type of on-track session within a race weekend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum SessionType {
    #[serde(rename = "FP1")]
    #[value(name = "FP1")]
    Practice1,
    #[serde(rename = "FP2")]
    #[value(name = "FP2")]
    Practice2,
    #[serde(rename = "FP3")]
    #[value(name = "FP3")]
    Practice3,
    #[serde(rename = "Q")]
    #[value(name = "Q")]
    Qualifying,
    #[serde(rename = "S")]
    #[value(name = "S")]
    Sprint,
    #[serde(rename = "R")]
    #[value(name = "R")]
    Race,
}

impl SessionType {
    pub const ALL: [SessionType; 6] = [
        SessionType::Practice1,
        SessionType::Practice2,
        SessionType::Practice3,
        SessionType::Qualifying,
        SessionType::Sprint,
        SessionType::Race,
    ];

    /// Code used in backend URLs
    pub fn code(&self) -> &'static str {
        match self {
            SessionType::Practice1 => "FP1",
            SessionType::Practice2 => "FP2",
            SessionType::Practice3 => "FP3",
            SessionType::Qualifying => "Q",
            SessionType::Sprint => "S",
            SessionType::Race => "R",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Practice1 => "Free Practice 1",
            SessionType::Practice2 => "Free Practice 2",
            SessionType::Practice3 => "Free Practice 3",
            SessionType::Qualifying => "Qualifying",
            SessionType::Sprint => "Sprint",
            SessionType::Race => "Race",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Race weekend events offered by the session selector
pub const EVENTS: [&str; 21] = [
    "Bahrain",
    "Imola",
    "Portimão",
    "Barcelona",
    "Monaco",
    "Baku",
    "France",
    "Austria",
    "Silverstone",
    "Hungary",
    "Spa",
    "Zandvoort",
    "Monza",
    "Sochi",
    "Istanbul",
    "Austin",
    "Mexico City",
    "São Paulo",
    "Qatar",
    "Jeddah",
    "Abu Dhabi",
];

/// Seasons the backend has data for
pub const FIRST_YEAR: i32 = 2018;
pub const LAST_YEAR: i32 = 2024;

/// Identifies one session: year, event and session type
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub year: i32,
    pub event: String,
    pub session_type: SessionType,
}

impl SessionKey {
    pub fn new(year: i32, event: impl Into<String>, session_type: SessionType) -> Self {
        Self {
            year,
            event: event.into(),
            session_type,
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} - {}", self.event, self.year, self.session_type)
    }
}

/// Basic session metadata
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionInfo {
    pub year: Option<i32>,
    pub event_name: Option<String>,
    pub location: Option<String>,
    pub session_name: Option<String>,
    pub session_date: Option<String>,
    pub session_type: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Driver {
    /// Three letter driver code (e.g. "VER")
    pub abbreviation: String,
    pub number: Option<u32>,
    pub name: String,
    pub team: String,
}

/// One timed lap by one driver. Durations are kept as the backend's text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lap {
    pub driver: String,
    pub lap_number: u32,
    pub lap_time: Option<String>,
    pub sector_1_time: Option<String>,
    pub sector_2_time: Option<String>,
    pub sector_3_time: Option<String>,
    pub compound: Option<String>,
    pub tyre_life: Option<u32>,
    pub is_personal_best: bool,
    pub is_fastest: bool,
}

/// Lap list response, optionally filtered by driver
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LapList {
    pub laps: Vec<Lap>,
    pub count: usize,
    /// Driver filter applied by the backend, if any
    pub driver: Option<String>,
}

impl LapList {
    /// Lap count reported by the backend, falling back to the list length
    pub fn total(&self) -> usize {
        if self.count > 0 {
            self.count
        } else {
            self.laps.len()
        }
    }
}

/// One classified driver in a session result
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultRow {
    pub position: Option<u32>,
    pub abbreviation: String,
    pub driver_number: Option<u32>,
    pub name: String,
    pub team: String,
    pub q1: Option<String>,
    pub q2: Option<String>,
    pub q3: Option<String>,
    pub best_lap_time: Option<String>,
    pub points: Option<f64>,
    pub status: Option<String>,
}

impl ResultRow {
    /// Points cell text: zero or missing points are shown as `-`
    pub fn points_cell(&self) -> String {
        match self.points {
            Some(points) if points > 0.0 => format!("{points}"),
            _ => "-".to_string(),
        }
    }

    /// Status cell text, `Finished` when the backend did not report one
    pub fn status_cell(&self) -> &str {
        match self.status.as_deref() {
            Some(status) if !status.is_empty() => status,
            _ => "Finished",
        }
    }

    pub fn is_winner(&self) -> bool {
        self.position == Some(1)
    }
}
