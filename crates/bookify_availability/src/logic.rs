// --- File: crates/bookify_availability/src/logic.rs ---
use bookify_common::{merge_intervals, overlaps_any, TimeInterval};
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::policy::{Resource, ResourceSelector, SchedulingPolicy, UnknownResource, WorkingWindow};

// --- Error Handling ---
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("Unsupported duration: {0} minutes")]
    UnsupportedDuration(i64),
    #[error("Unknown resource: {0}")]
    UnknownResource(String),
}

impl From<UnknownResource> for AvailabilityError {
    fn from(err: UnknownResource) -> Self {
        AvailabilityError::UnknownResource(err.0)
    }
}

// --- Data Structures ---
#[derive(Debug, Clone)]
pub struct SlotQuery<'a> {
    pub date: NaiveDate,
    /// "Today" in the policy zone; decides the booking horizon.
    pub today: NaiveDate,
    pub duration_minutes: i64,
    pub resource: &'a ResourceSelector,
}

/// One candidate start time of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Slot {
    #[serde(serialize_with = "serialize_hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "09:00"))]
    pub time: NaiveTime,
    pub available: bool,
}

fn serialize_hhmm<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format("%H:%M"))
}

/// A generated candidate: its local label and the absolute interval it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub label: NaiveTime,
    pub interval: TimeInterval,
}

// --- Availability Logic ---

/// Candidate starts inside one window, every `policy.step` from the window start,
/// as long as `start + duration` stays within the window end.
pub fn window_candidates(
    policy: &SchedulingPolicy,
    date: NaiveDate,
    window: &WorkingWindow,
    duration: Duration,
) -> Vec<Candidate> {
    // Wall-clock to absolute once per window
    let (Some(open), Some(close)) = (
        policy.to_instant(date, window.start),
        policy.to_instant(date, window.end),
    ) else {
        warn!(
            "Window {} on {} does not exist in {}, skipping",
            window, date, policy.time_zone
        );
        return Vec::new();
    };

    let mut candidates = Vec::new();
    let mut start = open;
    while let Ok(interval) = TimeInterval::starting_at(start, duration) {
        if interval.end() > close {
            break;
        }
        candidates.push(Candidate {
            label: start.with_timezone(&policy.time_zone).time(),
            interval,
        });
        start += policy.step;
    }
    candidates
}

/// Computes the day's slots for the query against already-fetched busy intervals.
///
/// Closed days and days outside the booking horizon yield an empty list. With
/// several resource windows (`any`), a start time is available if it is free
/// for at least one resource.
pub fn compute_slots(
    policy: &SchedulingPolicy,
    query: &SlotQuery<'_>,
    busy: &[TimeInterval],
) -> Result<Vec<Slot>, AvailabilityError> {
    compute_slots_per_resource(policy, query, |_| busy)
}

/// Like [`compute_slots`], but each resource window is tested against the busy
/// intervals `busy_for` returns for its resource (`None` for the global hours).
pub fn compute_slots_per_resource<'b, F>(
    policy: &SchedulingPolicy,
    query: &SlotQuery<'_>,
    busy_for: F,
) -> Result<Vec<Slot>, AvailabilityError>
where
    F: Fn(Option<&Resource>) -> &'b [TimeInterval],
{
    let duration = policy
        .requested_duration(query.duration_minutes)
        .ok_or(AvailabilityError::UnsupportedDuration(query.duration_minutes))?;
    let windows = policy.windows_for(query.date, query.resource)?;

    if windows.is_empty() || !policy.horizon.contains(query.date, query.today) {
        debug!("{} is not bookable for {:?}", query.date, query.resource);
        return Ok(Vec::new());
    }

    let mut merged: BTreeMap<NaiveTime, bool> = BTreeMap::new();
    for resource_window in &windows {
        let busy = merge_intervals(busy_for(resource_window.resource));
        // A label repeated by the autumn DST change is free only if both instants are
        let mut in_window: BTreeMap<NaiveTime, bool> = BTreeMap::new();
        for candidate in window_candidates(policy, query.date, &resource_window.window, duration) {
            let available = !overlaps_any(&candidate.interval, &busy);
            in_window
                .entry(candidate.label)
                .and_modify(|slot_available| *slot_available &= available)
                .or_insert(available);
        }
        for (label, available) in in_window {
            merged
                .entry(label)
                .and_modify(|slot_available| *slot_available |= available)
                .or_insert(available);
        }
    }

    debug!(
        "Computed {} slots for {} ({} min, {} windows)",
        merged.len(),
        query.date,
        query.duration_minutes,
        windows.len()
    );

    Ok(merged
        .into_iter()
        .map(|(time, available)| Slot { time, available })
        .collect())
}
