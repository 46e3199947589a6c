// Dashboard model: session selection, loaded data and background fetching

pub mod fetcher;
pub mod state;

pub use fetcher::{Fetcher, Notify, fetch, load_session};
pub use state::{CircuitSlice, DashboardState, FetchOutcome, FetchRequest, SessionBundle, Tab};
