// Sorting of result and lap tables

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::lap_time::{MISSING_LAP_TIME, parse_lap_time_seconds};
use crate::session::{Lap, ResultRow};

/// Rank used for rows without a classified position
pub const UNCLASSIFIED_POSITION: f64 = 999.0;
/// Points used for rows without a points total
pub const MISSING_POINTS: f64 = -1.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Comparable value extracted from a row for one sort key
#[derive(Clone, Debug, PartialEq)]
pub enum SortValue {
    /// Numeric value with a sentinel already substituted for missing data
    Rank(f64),
    /// Duration in seconds, [`MISSING_LAP_TIME`] when absent
    Duration(f64),
    /// Compared case-insensitively with embedded numbers ordered by value
    Text(String),
}

impl SortValue {
    /// Compare two values in the given direction. Missing durations always
    /// come last, whichever way the column is sorted.
    pub fn compare(&self, other: &SortValue, direction: SortDirection) -> Ordering {
        match (self, other) {
            (SortValue::Duration(a), SortValue::Duration(b)) => {
                match (*a == MISSING_LAP_TIME, *b == MISSING_LAP_TIME) {
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    _ => direction.apply(a.total_cmp(b)),
                }
            }
            (SortValue::Rank(a), SortValue::Rank(b)) => direction.apply(a.total_cmp(b)),
            (SortValue::Text(a), SortValue::Text(b)) => direction.apply(natural_cmp(a, b)),
            _ => Ordering::Equal,
        }
    }
}

/// A table row that can be ordered by a fixed set of keys
pub trait Sortable {
    type Key: Copy + PartialEq;

    fn sort_value(&self, key: Self::Key) -> SortValue;
}

/// Return a new sequence of `rows` ordered by `key`. The input is left untouched
/// and rows that compare equal keep their relative order.
pub fn order_by<R>(rows: &[R], key: R::Key, direction: SortDirection) -> Vec<R>
where
    R: Sortable + Clone,
{
    let mut keyed: Vec<(SortValue, &R)> = rows.iter().map(|row| (row.sort_value(key), row)).collect();
    keyed.sort_by(|(a, _), (b, _)| a.compare(b, direction));
    keyed.into_iter().map(|(_, row)| row.clone()).collect()
}

/// Active sort column and direction of a table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K: Copy + PartialEq> SortState<K> {
    pub fn new(key: K) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    /// Selecting the active key flips the direction, a different key starts ascending
    pub fn select(self, key: K) -> Self {
        if key == self.key {
            Self {
                key,
                direction: self.direction.reversed(),
            }
        } else {
            Self::new(key)
        }
    }

    pub fn apply<R>(&self, rows: &[R]) -> Vec<R>
    where
        R: Sortable<Key = K> + Clone,
    {
        order_by(rows, self.key, self.direction)
    }
}

/// Case-insensitive comparison where runs of digits compare by numeric value,
/// so "2" sorts before "10". Common Latin accents compare as their base letter;
/// strings equal after folding are ordered by code point.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    let mut accent_order = Ordering::Equal;

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return accent_order,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let left_digits = take_digits(&mut left);
                let right_digits = take_digits(&mut right);
                let ordering = compare_digit_runs(&left_digits, &right_digits);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                let ordering = fold_char(l).cmp(&fold_char(r));
                if ordering != Ordering::Equal {
                    return ordering;
                }
                if accent_order == Ordering::Equal {
                    accent_order = l.to_lowercase().cmp(r.to_lowercase());
                }
                left.next();
                right.next();
            }
        }
    }
}

/// Lowercase `c` and strip common Latin diacritics
fn fold_char(c: char) -> char {
    match c.to_lowercase().next().unwrap_or(c) {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ł' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ő' => 'o',
        'ř' => 'r',
        'ś' | 'š' | 'ş' => 's',
        'ť' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Columns of the session results table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ResultSortKey {
    Position,
    Driver,
    Name,
    Team,
    Q1,
    Q2,
    Q3,
    BestLap,
    Points,
}

impl ResultSortKey {
    pub const ALL: [ResultSortKey; 9] = [
        ResultSortKey::Position,
        ResultSortKey::Driver,
        ResultSortKey::Name,
        ResultSortKey::Team,
        ResultSortKey::Q1,
        ResultSortKey::Q2,
        ResultSortKey::Q3,
        ResultSortKey::BestLap,
        ResultSortKey::Points,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ResultSortKey::Position => "Pos",
            ResultSortKey::Driver => "Driver",
            ResultSortKey::Name => "Name",
            ResultSortKey::Team => "Team",
            ResultSortKey::Q1 => "Q1",
            ResultSortKey::Q2 => "Q2",
            ResultSortKey::Q3 => "Q3",
            ResultSortKey::BestLap => "Best Lap",
            ResultSortKey::Points => "Points",
        }
    }
}

impl Sortable for ResultRow {
    type Key = ResultSortKey;

    fn sort_value(&self, key: ResultSortKey) -> SortValue {
        match key {
            ResultSortKey::Position => SortValue::Rank(
                self.position
                    .map(f64::from)
                    .unwrap_or(UNCLASSIFIED_POSITION),
            ),
            ResultSortKey::Driver => SortValue::Text(self.abbreviation.clone()),
            ResultSortKey::Name => SortValue::Text(self.name.clone()),
            ResultSortKey::Team => SortValue::Text(self.team.clone()),
            ResultSortKey::Q1 => duration_value(self.q1.as_deref()),
            ResultSortKey::Q2 => duration_value(self.q2.as_deref()),
            ResultSortKey::Q3 => duration_value(self.q3.as_deref()),
            ResultSortKey::BestLap => duration_value(self.best_lap_time.as_deref()),
            ResultSortKey::Points => SortValue::Rank(self.points.unwrap_or(MISSING_POINTS)),
        }
    }
}

/// Columns of the lap table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum LapSortKey {
    LapNumber,
    Driver,
    LapTime,
    Sector1,
    Sector2,
    Sector3,
}

impl LapSortKey {
    pub const ALL: [LapSortKey; 6] = [
        LapSortKey::Driver,
        LapSortKey::LapNumber,
        LapSortKey::LapTime,
        LapSortKey::Sector1,
        LapSortKey::Sector2,
        LapSortKey::Sector3,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LapSortKey::LapNumber => "Lap",
            LapSortKey::Driver => "Driver",
            LapSortKey::LapTime => "Lap Time",
            LapSortKey::Sector1 => "Sector 1",
            LapSortKey::Sector2 => "Sector 2",
            LapSortKey::Sector3 => "Sector 3",
        }
    }
}

impl Sortable for Lap {
    type Key = LapSortKey;

    fn sort_value(&self, key: LapSortKey) -> SortValue {
        match key {
            LapSortKey::LapNumber => SortValue::Rank(f64::from(self.lap_number)),
            LapSortKey::Driver => SortValue::Text(self.driver.clone()),
            LapSortKey::LapTime => duration_value(self.lap_time.as_deref()),
            LapSortKey::Sector1 => duration_value(self.sector_1_time.as_deref()),
            LapSortKey::Sector2 => duration_value(self.sector_2_time.as_deref()),
            LapSortKey::Sector3 => duration_value(self.sector_3_time.as_deref()),
        }
    }
}

fn duration_value(value: Option<&str>) -> SortValue {
    SortValue::Duration(parse_lap_time_seconds(value))
}
