// Dashboard session loading through the background fetcher

use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use f1lab::dashboard::CircuitSlice;
use f1lab::{
    CircuitGeometry, DashboardState, Driver, F1LabError, FetchOutcome, Fetcher, LapList,
    ResultRow, SessionDataSource, SessionInfo, SessionKey, SessionType, Tab,
};

/// Serves canned data and fails for one chosen event
struct CannedSource {
    failing_event: &'static str,
}

impl CannedSource {
    fn check(&self, key: &SessionKey) -> Result<(), F1LabError> {
        if key.event == self.failing_event {
            return Err(F1LabError::ApiError {
                detail: format!("Session not found: {}", key.event),
            });
        }
        Ok(())
    }
}

impl SessionDataSource for CannedSource {
    fn session_info(&self, key: &SessionKey) -> Result<SessionInfo, F1LabError> {
        self.check(key)?;
        Ok(SessionInfo {
            year: Some(key.year),
            event_name: Some(format!("{} Grand Prix", key.event)),
            session_name: Some(key.session_type.label().to_string()),
            ..Default::default()
        })
    }

    fn drivers(&self, key: &SessionKey) -> Result<Vec<Driver>, F1LabError> {
        self.check(key)?;
        Ok(["VER", "HAM", "BOT"]
            .iter()
            .map(|code| Driver {
                abbreviation: code.to_string(),
                ..Default::default()
            })
            .collect())
    }

    fn laps(&self, key: &SessionKey, driver: Option<&str>) -> Result<LapList, F1LabError> {
        self.check(key)?;
        let count = if driver.is_some() { 78 } else { 234 };
        Ok(LapList {
            laps: Vec::new(),
            count,
            driver: driver.map(str::to_string),
        })
    }

    fn results(&self, key: &SessionKey) -> Result<Vec<ResultRow>, F1LabError> {
        self.check(key)?;
        Ok(vec![ResultRow {
            position: Some(1),
            abbreviation: "VER".to_string(),
            points: Some(25.0),
            ..Default::default()
        }])
    }

    fn circuit(&self, key: &SessionKey) -> Result<CircuitGeometry, F1LabError> {
        self.check(key)?;
        Ok(CircuitGeometry {
            track: vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]],
            location: Some("Monte Carlo".to_string()),
            ..Default::default()
        })
    }
}

fn run_requests(
    fetcher: &Fetcher,
    outcomes: &mpsc::Receiver<FetchOutcome>,
    state: DashboardState,
    requests: Vec<f1lab::FetchRequest>,
) -> DashboardState {
    let expected = requests.len();
    for handle in fetcher.dispatch_all(requests) {
        handle.join().unwrap();
    }
    (0..expected).fold(state, |state, _| {
        let outcome = outcomes.recv_timeout(Duration::from_secs(5)).unwrap();
        state.apply(outcome)
    })
}

#[test]
fn test_load_filter_and_fail() {
    let (tx, rx) = mpsc::channel();
    let fetcher = Fetcher::new(
        Arc::new(CannedSource {
            failing_event: "Imola",
        }),
        tx,
        Arc::new(|| {}),
    );

    let (state, requests) =
        DashboardState::new().select_session(SessionKey::new(2021, "Monaco", SessionType::Race));
    let state = run_requests(&fetcher, &rx, state, requests);

    assert!(!state.is_loading());
    assert!(state.error.is_none());
    assert_eq!(state.drivers.len(), 3);
    assert_eq!(state.laps.total(), 234);
    assert_eq!(state.results.len(), 1);
    assert_eq!(state.title().as_deref(), Some("Monaco Grand Prix 2021 - Race"));
    assert!(matches!(state.circuit, CircuitSlice::Loaded(_)));

    // clicking a driver reloads only that driver's laps
    let (state, request) = state.filter_laps(Some("HAM".to_string())).unwrap();
    let state = run_requests(&fetcher, &rx, state, vec![request]);
    assert_eq!(state.active_tab, Tab::Laps);
    assert_eq!(state.laps.driver.as_deref(), Some("HAM"));
    assert_eq!(state.laps.total(), 78);

    // a failing session clears everything loaded so far
    let (state, requests) =
        state.select_session(SessionKey::new(2021, "Imola", SessionType::Qualifying));
    let state = run_requests(&fetcher, &rx, state, requests);
    assert_eq!(state.error.as_deref(), Some("Session not found: Imola"));
    assert!(state.drivers.is_empty());
    assert!(state.results.is_empty());
    assert_eq!(state.laps.total(), 0);
    assert!(matches!(state.circuit, CircuitSlice::Failed(_)));
    assert!(state.session_info.is_none());
}
