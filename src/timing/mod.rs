// Lap time handling: parsing backend durations, display formatting and table ordering

pub mod lap_time;
pub mod ordering;

pub use lap_time::{MISSING_LAP_TIME, format_lap_time, lap_time_cell, parse_lap_time_seconds};
pub use ordering::{
    LapSortKey, ResultSortKey, SortDirection, SortState, SortValue, Sortable, natural_cmp,
    order_by,
};
