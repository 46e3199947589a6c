// Runs fetch requests off the UI thread and reports outcomes over a channel

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle, ScopedJoinHandle};

use log::{debug, error};

use super::state::{FetchOutcome, FetchRequest, SessionBundle};
use crate::api::SessionDataSource;
use crate::errors::F1LabError;
use crate::session::SessionKey;

/// Called after every outcome is sent, so the UI can wake up
pub type Notify = Arc<dyn Fn() + Send + Sync>;

pub struct Fetcher {
    source: Arc<dyn SessionDataSource>,
    outcomes: Sender<FetchOutcome>,
    notify: Notify,
}

impl Fetcher {
    pub fn new(source: Arc<dyn SessionDataSource>, outcomes: Sender<FetchOutcome>, notify: Notify) -> Self {
        Self {
            source,
            outcomes,
            notify,
        }
    }

    /// Run `request` on its own thread. The outcome is sent even when the
    /// fetch fails; a closed channel is only logged.
    pub fn dispatch(&self, request: FetchRequest) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        let outcomes = self.outcomes.clone();
        let notify = Arc::clone(&self.notify);
        thread::spawn(move || {
            let outcome = fetch(source.as_ref(), request);
            if outcomes.send(outcome).is_err() {
                debug!("Dashboard closed before fetch completed");
                return;
            }
            notify();
        })
    }

    pub fn dispatch_all(&self, requests: Vec<FetchRequest>) -> Vec<JoinHandle<()>> {
        requests.into_iter().map(|r| self.dispatch(r)).collect()
    }
}

/// Perform `request` on the calling thread
pub fn fetch(source: &dyn SessionDataSource, request: FetchRequest) -> FetchOutcome {
    match request {
        FetchRequest::Session { generation, key } => FetchOutcome::Session {
            generation,
            result: load_session(source, &key).map_err(message),
        },
        FetchRequest::Laps {
            generation,
            key,
            driver,
        } => FetchOutcome::Laps {
            generation,
            result: source.laps(&key, driver.as_deref()).map_err(message),
        },
        FetchRequest::Info { generation, key } => FetchOutcome::Info {
            generation,
            result: source.session_info(&key).map_err(message),
        },
        FetchRequest::Circuit { generation, key } => FetchOutcome::Circuit {
            generation,
            result: source.circuit(&key).map_err(message),
        },
    }
}

/// Fetch drivers, laps and results concurrently. Fails as a whole when any
/// of the three fails.
pub fn load_session(source: &dyn SessionDataSource, key: &SessionKey) -> Result<SessionBundle, F1LabError> {
    debug!("Loading session {}", key);
    thread::scope(|scope| {
        let drivers = scope.spawn(|| source.drivers(key));
        let laps = scope.spawn(|| source.laps(key, None));
        let results = scope.spawn(|| source.results(key));

        Ok(SessionBundle {
            drivers: join(drivers, "drivers")?,
            laps: join(laps, "laps")?,
            results: join(results, "results")?,
        })
    })
}

fn join<T>(handle: ScopedJoinHandle<'_, Result<T, F1LabError>>, what: &str) -> Result<T, F1LabError> {
    handle.join().unwrap_or_else(|_| {
        error!("Fetch worker for {} panicked", what);
        Err(F1LabError::FetchWorkerError {
            what: what.to_string(),
        })
    })
}

fn message(e: F1LabError) -> String {
    e.to_string()
}
