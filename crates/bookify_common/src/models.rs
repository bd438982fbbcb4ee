// --- File: crates/bookify_common/src/models.rs ---
//! Time interval model shared by the availability engine and the calendar adapters.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while building a [`TimeInterval`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },
    #[error("Interval start {start} must be before its end {end}")]
    EmptyInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// A half-open range `[start, end)` of absolute instants. `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = IntervalError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        TimeInterval::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, IntervalError> {
        if start >= end {
            return Err(IntervalError::EmptyInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Interval of `duration` beginning at `start`.
    pub fn starting_at(start: DateTime<Utc>, duration: Duration) -> Result<Self, IntervalError> {
        let end = start
            .checked_add_signed(duration)
            .ok_or(IntervalError::EmptyInterval { start, end: start })?;
        Self::new(start, end)
    }

    /// Parses an RFC 3339 pair, the only way external timestamps enter the system.
    pub fn parse_rfc3339(start: &str, end: &str) -> Result<Self, IntervalError> {
        Self::new(parse_instant(start)?, parse_instant(end)?)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open intersection test: touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, IntervalError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| IntervalError::InvalidTimestamp {
            value: value.to_string(),
            reason: err.to_string(),
        })
}

/// Sorts and unions overlapping or touching intervals.
pub fn merge_intervals(intervals: &[TimeInterval]) -> Vec<TimeInterval> {
    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|interval| interval.start);

    let mut merged: Vec<TimeInterval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                last.end = last.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// True if `candidate` overlaps any of `busy`.
pub fn overlaps_any(candidate: &TimeInterval, busy: &[TimeInterval]) -> bool {
    busy.iter().any(|interval| candidate.overlaps(interval))
}
