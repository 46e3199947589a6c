// Dashboard state, replaced wholesale on every update

use log::{debug, warn};

use crate::session::{Driver, Lap, LapList, ResultRow, SessionInfo, SessionKey};
use crate::timing::{LapSortKey, ResultSortKey, SortState};
use crate::track_map::{CircuitGeometry, TrackProjection, project};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Drivers,
    Laps,
    Results,
    TrackMap,
}

/// Circuit geometry slice of the dashboard
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CircuitSlice {
    #[default]
    NotRequested,
    Loading,
    Loaded(CircuitGeometry),
    /// Fetch failed or the backend reported an error for this circuit
    Failed(String),
}

impl CircuitSlice {
    pub fn projection(&self) -> TrackProjection {
        match self {
            CircuitSlice::Loaded(circuit) => project(Some(circuit)),
            _ => project(None),
        }
    }

    pub fn geometry(&self) -> Option<&CircuitGeometry> {
        match self {
            CircuitSlice::Loaded(circuit) => Some(circuit),
            _ => None,
        }
    }
}

/// Drivers, laps and results of one session, loaded together
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionBundle {
    pub drivers: Vec<Driver>,
    pub laps: LapList,
    pub results: Vec<ResultRow>,
}

/// Work for the fetcher. `generation` is echoed back in the outcome.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchRequest {
    Session { generation: u64, key: SessionKey },
    Laps {
        generation: u64,
        key: SessionKey,
        driver: Option<String>,
    },
    Info { generation: u64, key: SessionKey },
    Circuit { generation: u64, key: SessionKey },
}

/// Completed fetch. Failures carry the message shown to the user.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchOutcome {
    Session {
        generation: u64,
        result: Result<SessionBundle, String>,
    },
    Laps {
        generation: u64,
        result: Result<LapList, String>,
    },
    Info {
        generation: u64,
        result: Result<SessionInfo, String>,
    },
    Circuit {
        generation: u64,
        result: Result<CircuitGeometry, String>,
    },
}

/// Latest request generation per slice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Generations {
    session: u64,
    laps: u64,
    info: u64,
    circuit: u64,
    /// Laps generation the current session bundle was requested with
    session_laps: u64,
    /// Laps generation of the data currently in `laps`
    laps_shown: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Pending {
    session: bool,
    laps: bool,
    circuit: bool,
}

/// Everything the dashboard shows. Transitions return a new state and leave
/// the current one untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardState {
    pub session: Option<SessionKey>,
    pub session_info: Option<SessionInfo>,
    pub drivers: Vec<Driver>,
    pub laps: LapList,
    pub results: Vec<ResultRow>,
    pub circuit: CircuitSlice,
    pub active_tab: Tab,
    /// Driver whose laps are shown, all drivers when `None`
    pub driver_filter: Option<String>,
    pub error: Option<String>,
    pub result_sort: SortState<ResultSortKey>,
    pub lap_sort: SortState<LapSortKey>,
    generations: Generations,
    pending: Pending,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            session: None,
            session_info: None,
            drivers: Vec::new(),
            laps: LapList::default(),
            results: Vec::new(),
            circuit: CircuitSlice::NotRequested,
            active_tab: Tab::Drivers,
            driver_filter: None,
            error: None,
            result_sort: SortState::new(ResultSortKey::Position),
            lap_sort: SortState::new(LapSortKey::LapNumber),
            generations: Generations::default(),
            pending: Pending::default(),
        }
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `key`. Any response still in flight for an earlier
    /// selection is ignored when it arrives.
    pub fn select_session(&self, key: SessionKey) -> (Self, Vec<FetchRequest>) {
        let generations = Generations {
            session: self.generations.session + 1,
            laps: self.generations.laps + 1,
            info: self.generations.info + 1,
            circuit: self.generations.circuit + 1,
            session_laps: self.generations.laps + 1,
            laps_shown: self.generations.laps_shown,
        };
        let next = Self {
            session: Some(key.clone()),
            session_info: None,
            circuit: CircuitSlice::Loading,
            driver_filter: None,
            error: None,
            generations,
            pending: Pending {
                session: true,
                laps: false,
                circuit: true,
            },
            ..self.clone()
        };
        let requests = vec![
            FetchRequest::Session {
                generation: generations.session,
                key: key.clone(),
            },
            FetchRequest::Info {
                generation: generations.info,
                key: key.clone(),
            },
            FetchRequest::Circuit {
                generation: generations.circuit,
                key,
            },
        ];
        (next, requests)
    }

    /// Reload the laps of the current session for one driver, or for all
    /// drivers with `None`. Returns `None` when no session is selected.
    pub fn filter_laps(&self, driver: Option<String>) -> Option<(Self, FetchRequest)> {
        let key = self.session.clone()?;
        let generation = self.generations.laps + 1;
        let next = Self {
            driver_filter: driver.clone(),
            active_tab: Tab::Laps,
            error: None,
            generations: Generations {
                laps: generation,
                ..self.generations
            },
            pending: Pending {
                laps: true,
                ..self.pending
            },
            ..self.clone()
        };
        Some((
            next,
            FetchRequest::Laps {
                generation,
                key,
                driver,
            },
        ))
    }

    pub fn select_tab(&self, tab: Tab) -> Self {
        Self {
            active_tab: tab,
            ..self.clone()
        }
    }

    pub fn sort_results(&self, key: ResultSortKey) -> Self {
        Self {
            result_sort: self.result_sort.select(key),
            ..self.clone()
        }
    }

    pub fn sort_laps(&self, key: LapSortKey) -> Self {
        Self {
            lap_sort: self.lap_sort.select(key),
            ..self.clone()
        }
    }

    /// Fold a completed fetch into a new state. Outcomes of superseded
    /// requests leave the state unchanged.
    pub fn apply(&self, outcome: FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Session { generation, result } => {
                if generation != self.generations.session {
                    debug!("Discarding stale session outcome {}", generation);
                    return self.clone();
                }
                let pending = Pending {
                    session: false,
                    ..self.pending
                };
                match result {
                    Ok(bundle) => {
                        // a driver filter that already landed is newer than the bundle's laps
                        if self.generations.laps_shown > self.generations.session_laps {
                            debug!("Keeping filtered laps over session bundle");
                            return Self {
                                drivers: bundle.drivers,
                                results: bundle.results,
                                pending,
                                ..self.clone()
                            };
                        }
                        Self {
                            drivers: bundle.drivers,
                            laps: bundle.laps,
                            results: bundle.results,
                            active_tab: Tab::Drivers,
                            generations: Generations {
                                laps_shown: self.generations.session_laps,
                                ..self.generations
                            },
                            pending,
                            ..self.clone()
                        }
                    }
                    Err(message) => {
                        warn!("Session load failed: {}", message);
                        Self {
                            drivers: Vec::new(),
                            laps: LapList::default(),
                            results: Vec::new(),
                            error: Some(message),
                            pending,
                            ..self.clone()
                        }
                    }
                }
            }
            FetchOutcome::Laps { generation, result } => {
                if generation != self.generations.laps {
                    debug!("Discarding stale laps outcome {}", generation);
                    return self.clone();
                }
                let pending = Pending {
                    laps: false,
                    ..self.pending
                };
                match result {
                    Ok(laps) => Self {
                        laps,
                        generations: Generations {
                            laps_shown: generation,
                            ..self.generations
                        },
                        pending,
                        ..self.clone()
                    },
                    Err(message) => {
                        warn!("Lap load failed: {}", message);
                        Self {
                            error: Some(message),
                            pending,
                            ..self.clone()
                        }
                    }
                }
            }
            FetchOutcome::Info { generation, result } => {
                if generation != self.generations.info {
                    debug!("Discarding stale session info outcome {}", generation);
                    return self.clone();
                }
                match result {
                    Ok(info) => Self {
                        session_info: Some(info),
                        ..self.clone()
                    },
                    Err(message) => {
                        warn!("Session info unavailable: {}", message);
                        self.clone()
                    }
                }
            }
            FetchOutcome::Circuit { generation, result } => {
                if generation != self.generations.circuit {
                    debug!("Discarding stale circuit outcome {}", generation);
                    return self.clone();
                }
                let circuit = match result {
                    Ok(geometry) => match geometry.error.clone() {
                        Some(reported) => CircuitSlice::Failed(reported),
                        None => CircuitSlice::Loaded(geometry),
                    },
                    Err(message) => CircuitSlice::Failed(message),
                };
                Self {
                    circuit,
                    pending: Pending {
                        circuit: false,
                        ..self.pending
                    },
                    ..self.clone()
                }
            }
        }
    }

    /// True while the session or a lap reload is in flight
    pub fn is_loading(&self) -> bool {
        self.pending.session || self.pending.laps
    }

    pub fn is_circuit_loading(&self) -> bool {
        self.pending.circuit
    }

    /// Results in the order selected by the user
    pub fn sorted_results(&self) -> Vec<ResultRow> {
        self.result_sort.apply(&self.results)
    }

    /// Laps in the order selected by the user
    pub fn sorted_laps(&self) -> Vec<Lap> {
        self.lap_sort.apply(&self.laps.laps)
    }

    /// Heading for the selected session, preferring backend metadata
    pub fn title(&self) -> Option<String> {
        let key = self.session.as_ref()?;
        let event = self
            .session_info
            .as_ref()
            .and_then(|info| info.event_name.clone())
            .unwrap_or_else(|| key.event.clone());
        let session = self
            .session_info
            .as_ref()
            .and_then(|info| info.session_name.clone())
            .unwrap_or_else(|| key.session_type.to_string());
        Some(format!("{} {} - {}", event, key.year, session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionType;
    use crate::track_map::CornerMarker;

    fn monaco() -> SessionKey {
        SessionKey::new(2021, "Monaco", SessionType::Race)
    }

    fn driver(code: &str) -> Driver {
        Driver {
            abbreviation: code.to_string(),
            ..Default::default()
        }
    }

    fn bundle() -> SessionBundle {
        SessionBundle {
            drivers: vec![driver("VER"), driver("HAM")],
            laps: LapList {
                laps: vec![Lap {
                    driver: "VER".to_string(),
                    lap_number: 1,
                    ..Default::default()
                }],
                count: 1,
                driver: None,
            },
            results: vec![ResultRow {
                position: Some(1),
                abbreviation: "VER".to_string(),
                ..Default::default()
            }],
        }
    }

    fn session_generation(requests: &[FetchRequest]) -> u64 {
        requests
            .iter()
            .find_map(|r| match r {
                FetchRequest::Session { generation, .. } => Some(*generation),
                _ => None,
            })
            .unwrap()
    }

    fn circuit_generation(requests: &[FetchRequest]) -> u64 {
        requests
            .iter()
            .find_map(|r| match r {
                FetchRequest::Circuit { generation, .. } => Some(*generation),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_select_session_issues_independent_requests() {
        let state = DashboardState::new();
        let (loading, requests) = state.select_session(monaco());

        assert_eq!(requests.len(), 3);
        assert!(loading.is_loading());
        assert!(loading.is_circuit_loading());
        assert_eq!(loading.circuit, CircuitSlice::Loading);
        assert_eq!(loading.session, Some(monaco()));
        // the previous record is untouched
        assert!(state.session.is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_session_outcome_replaces_slices() {
        let (loading, requests) = DashboardState::new()
            .select_tab(Tab::Results)
            .select_session(monaco());
        let loaded = loading.apply(FetchOutcome::Session {
            generation: session_generation(&requests),
            result: Ok(bundle()),
        });

        assert!(!loaded.is_loading());
        assert_eq!(loaded.drivers.len(), 2);
        assert_eq!(loaded.laps.total(), 1);
        assert_eq!(loaded.results.len(), 1);
        assert_eq!(loaded.active_tab, Tab::Drivers);
        assert!(loaded.error.is_none());
    }

    #[test]
    fn test_session_failure_clears_all_slices() {
        let (loading, requests) = DashboardState::new().select_session(monaco());
        let loaded = loading.apply(FetchOutcome::Session {
            generation: session_generation(&requests),
            result: Ok(bundle()),
        });

        let (reloading, requests) = loaded.select_session(SessionKey::new(2021, "Spa", SessionType::Qualifying));
        let failed = reloading.apply(FetchOutcome::Session {
            generation: session_generation(&requests),
            result: Err("Session not found: Spa".to_string()),
        });

        assert!(failed.drivers.is_empty());
        assert!(failed.laps.laps.is_empty());
        assert!(failed.results.is_empty());
        assert_eq!(failed.error.as_deref(), Some("Session not found: Spa"));
        assert!(!failed.is_loading());
    }

    #[test]
    fn test_stale_session_outcome_is_discarded() {
        let (first, first_requests) = DashboardState::new().select_session(monaco());
        let (second, second_requests) =
            first.select_session(SessionKey::new(2022, "Imola", SessionType::Sprint));

        let after_stale = second.apply(FetchOutcome::Session {
            generation: session_generation(&first_requests),
            result: Ok(bundle()),
        });
        assert_eq!(after_stale, second);
        assert!(after_stale.is_loading());

        let after_current = after_stale.apply(FetchOutcome::Session {
            generation: session_generation(&second_requests),
            result: Ok(SessionBundle::default()),
        });
        assert!(!after_current.is_loading());
        assert!(after_current.drivers.is_empty());
    }

    #[test]
    fn test_filter_laps_requires_session() {
        assert!(DashboardState::new().filter_laps(Some("VER".to_string())).is_none());
    }

    #[test]
    fn test_filter_laps_failure_keeps_other_slices() {
        let (loading, requests) = DashboardState::new().select_session(monaco());
        let loaded = loading.apply(FetchOutcome::Session {
            generation: session_generation(&requests),
            result: Ok(bundle()),
        });

        let (filtering, request) = loaded.filter_laps(Some("HAM".to_string())).unwrap();
        assert_eq!(filtering.active_tab, Tab::Laps);
        assert!(filtering.is_loading());
        let FetchRequest::Laps {
            generation, driver, ..
        } = request
        else {
            panic!("expected a laps request");
        };
        assert_eq!(driver.as_deref(), Some("HAM"));

        let failed = filtering.apply(FetchOutcome::Laps {
            generation,
            result: Err("Failed to fetch laps".to_string()),
        });
        assert_eq!(failed.error.as_deref(), Some("Failed to fetch laps"));
        assert_eq!(failed.drivers.len(), 2);
        assert_eq!(failed.results.len(), 1);
        assert_eq!(failed.laps.total(), 1);
        assert!(!failed.is_loading());
    }

    #[test]
    fn test_superseded_lap_filter_is_discarded() {
        let (loading, requests) = DashboardState::new().select_session(monaco());
        let loaded = loading.apply(FetchOutcome::Session {
            generation: session_generation(&requests),
            result: Ok(bundle()),
        });
        let (first, first_request) = loaded.filter_laps(Some("VER".to_string())).unwrap();
        let (second, _) = first.filter_laps(Some("HAM".to_string())).unwrap();

        let FetchRequest::Laps { generation, .. } = first_request else {
            panic!("expected a laps request");
        };
        let after = second.apply(FetchOutcome::Laps {
            generation,
            result: Ok(LapList::default()),
        });
        assert_eq!(after, second);
        assert_eq!(after.driver_filter.as_deref(), Some("HAM"));
    }

    #[test]
    fn test_filtered_laps_landing_before_bundle_are_kept() {
        let (loading, requests) = DashboardState::new().select_session(monaco());
        let (filtering, request) = loading.filter_laps(Some("HAM".to_string())).unwrap();
        let FetchRequest::Laps { generation, .. } = request else {
            panic!("expected a laps request");
        };
        let filtered = filtering.apply(FetchOutcome::Laps {
            generation,
            result: Ok(LapList {
                laps: vec![Lap {
                    driver: "HAM".to_string(),
                    lap_number: 1,
                    ..Default::default()
                }],
                count: 1,
                driver: Some("HAM".to_string()),
            }),
        });

        let loaded = filtered.apply(FetchOutcome::Session {
            generation: session_generation(&requests),
            result: Ok(bundle()),
        });
        assert!(!loaded.is_loading());
        assert_eq!(loaded.driver_filter.as_deref(), Some("HAM"));
        assert_eq!(loaded.laps.driver.as_deref(), Some("HAM"));
        assert!(loaded.laps.laps.iter().all(|lap| lap.driver == "HAM"));
        assert_eq!(loaded.active_tab, Tab::Laps);
        assert_eq!(loaded.drivers.len(), 2);
        assert_eq!(loaded.results.len(), 1);
    }

    #[test]
    fn test_bundle_landing_before_pending_filter_is_replaced() {
        let (loading, requests) = DashboardState::new().select_session(monaco());
        let (filtering, request) = loading.filter_laps(Some("HAM".to_string())).unwrap();
        let loaded = filtering.apply(FetchOutcome::Session {
            generation: session_generation(&requests),
            result: Ok(bundle()),
        });
        assert_eq!(loaded.laps.total(), 1);
        assert!(loaded.is_loading());

        let FetchRequest::Laps { generation, .. } = request else {
            panic!("expected a laps request");
        };
        let filtered = loaded.apply(FetchOutcome::Laps {
            generation,
            result: Ok(LapList {
                driver: Some("HAM".to_string()),
                ..Default::default()
            }),
        });
        assert_eq!(filtered.laps.driver.as_deref(), Some("HAM"));
        assert!(!filtered.is_loading());
    }

    #[test]
    fn test_circuit_outcomes() {
        let (loading, requests) = DashboardState::new().select_session(monaco());
        let generation = circuit_generation(&requests);

        let geometry = CircuitGeometry {
            track: vec![[0.0, 0.0], [10.0, 0.0]],
            corners: vec![CornerMarker::new(1, 10.0, 0.0)],
            location: Some("Monte Carlo".to_string()),
            error: None,
        };
        let loaded = loading.apply(FetchOutcome::Circuit {
            generation,
            result: Ok(geometry.clone()),
        });
        assert!(!loaded.is_circuit_loading());
        assert_eq!(loaded.circuit.geometry(), Some(&geometry));
        assert!(loaded.circuit.projection().scene().is_some());

        let reported = loading.apply(FetchOutcome::Circuit {
            generation,
            result: Ok(CircuitGeometry {
                error: Some("No position data".to_string()),
                ..Default::default()
            }),
        });
        assert_eq!(reported.circuit, CircuitSlice::Failed("No position data".to_string()));
        assert_eq!(reported.circuit.projection(), TrackProjection::NoData);

        let failed = loading.apply(FetchOutcome::Circuit {
            generation,
            result: Err("timed out".to_string()),
        });
        assert_eq!(failed.circuit, CircuitSlice::Failed("timed out".to_string()));
        // circuit failures do not touch the session error
        assert!(failed.error.is_none());
    }

    #[test]
    fn test_title_prefers_session_info() {
        let (loading, requests) = DashboardState::new().select_session(monaco());
        assert_eq!(loading.title().as_deref(), Some("Monaco 2021 - R"));

        let info_generation = requests
            .iter()
            .find_map(|r| match r {
                FetchRequest::Info { generation, .. } => Some(*generation),
                _ => None,
            })
            .unwrap();
        let with_info = loading.apply(FetchOutcome::Info {
            generation: info_generation,
            result: Ok(SessionInfo {
                event_name: Some("Monaco Grand Prix".to_string()),
                session_name: Some("Race".to_string()),
                ..Default::default()
            }),
        });
        assert_eq!(with_info.title().as_deref(), Some("Monaco Grand Prix 2021 - Race"));

        let without_info = loading.apply(FetchOutcome::Info {
            generation: info_generation,
            result: Err("Session not found".to_string()),
        });
        assert!(without_info.session_info.is_none());
        assert!(without_info.error.is_none());
    }

    #[test]
    fn test_sorted_results_follow_sort_state() {
        let state = DashboardState {
            results: vec![
                ResultRow {
                    position: Some(2),
                    points: Some(18.0),
                    ..Default::default()
                },
                ResultRow {
                    position: Some(1),
                    points: Some(25.0),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let positions: Vec<Option<u32>> = state.sorted_results().iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![Some(1), Some(2)]);

        let state = state.sort_results(ResultSortKey::Position);
        let positions: Vec<Option<u32>> = state.sorted_results().iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![Some(2), Some(1)]);
    }
}
