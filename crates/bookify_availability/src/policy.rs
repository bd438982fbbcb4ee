// --- File: crates/bookify_availability/src/policy.rs ---
//! Scheduling policy: opening hours, staff shifts, durations and the booking horizon.
//!
//! A [`SchedulingPolicy`] is built once from [`BookingConfig`] and passed into the
//! engine on every call. All wall-clock times are interpreted in its `time_zone`.

use bookify_common::TimeInterval;
use bookify_config::{BookingConfig, HoursConfig};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors in the booking section of the configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Unknown time zone: {0}")]
    InvalidTimeZone(String),
    #[error("Unknown weekday: {0}")]
    InvalidWeekday(String),
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("Working window {start}-{end} must start before it ends")]
    EmptyWindow { start: NaiveTime, end: NaiveTime },
    #[error("{scope} has more than one window on {day}")]
    DuplicateWindow { scope: String, day: Weekday },
    #[error("Slot step must be positive, got {0} minutes")]
    InvalidStep(i64),
    #[error("Durations must be positive, got {0} minutes")]
    InvalidDuration(i64),
    #[error("At least one bookable duration is required")]
    NoDurations,
    #[error("Invalid booking horizon: {min} to {max} days ahead")]
    InvalidHorizon { min: i64, max: i64 },
    #[error("Staff id must not be empty")]
    EmptyResourceId,
    #[error("Staff id '{0}' is configured twice")]
    DuplicateResource(String),
}

/// A resource selector named a resource the policy does not know.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown resource: {0}")]
pub struct UnknownResource(pub String);

/// Opening hours of one day, `[start, end)` in local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WorkingWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, PolicyError> {
        if start >= end {
            return Err(PolicyError::EmptyWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// True if `[time, time + duration)` lies inside the window on the same day.
    pub fn fits(&self, time: NaiveTime, duration: Duration) -> bool {
        let (end, wrapped) = time.overflowing_add_signed(duration);
        wrapped == 0 && time >= self.start && end <= self.end && end > time
    }

    /// True if `time` is a whole number of `step`s after the window start.
    pub fn on_grid(&self, time: NaiveTime, step: Duration) -> bool {
        let step_seconds = step.num_seconds();
        if time < self.start || step_seconds <= 0 {
            return false;
        }
        (time - self.start).num_seconds() % step_seconds == 0
    }
}

impl fmt::Display for WorkingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Zero or one window per weekday, indexed from Monday.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyHours {
    days: [Option<WorkingWindow>; 7],
}

impl WeeklyHours {
    pub fn window(&self, day: Weekday) -> Option<WorkingWindow> {
        self.days[day.num_days_from_monday() as usize]
    }

    pub fn set(&mut self, day: Weekday, window: WorkingWindow) {
        self.days[day.num_days_from_monday() as usize] = Some(window);
    }

    /// Builds the week from config blocks; a weekday may appear in only one block.
    pub fn from_config(scope: &str, blocks: &[HoursConfig]) -> Result<Self, PolicyError> {
        let mut hours = WeeklyHours::default();
        for block in blocks {
            let window = WorkingWindow::new(parse_hhmm(&block.start)?, parse_hhmm(&block.end)?)?;
            for name in &block.days {
                let day = parse_weekday(name)?;
                if hours.window(day).is_some() {
                    return Err(PolicyError::DuplicateWindow {
                        scope: scope.to_string(),
                        day,
                    });
                }
                hours.set(day, window);
            }
        }
        Ok(hours)
    }
}

/// A bookable staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: String,
    pub name: String,
    /// Calendar holding this resource's busy time, if not the shared one.
    pub calendar_id: Option<String>,
    pub hours: WeeklyHours,
}

/// Which resource a caller asks for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResourceSelector {
    /// Union over every resource (or the global hours when none are configured).
    #[default]
    Any,
    Specific(String),
}

impl FromStr for ResourceSelector {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("any") {
            Ok(ResourceSelector::Any)
        } else {
            Ok(ResourceSelector::Specific(value.to_string()))
        }
    }
}

impl ResourceSelector {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(value) => value.parse().unwrap_or_default(),
            None => ResourceSelector::Any,
        }
    }
}

/// Dates a booking may target, counted in days from "today" in the policy zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingHorizon {
    pub min_days_ahead: i64,
    pub max_days_ahead: i64,
}

impl BookingHorizon {
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let days_ahead = (date - today).num_days();
        days_ahead >= self.min_days_ahead && days_ahead <= self.max_days_ahead
    }
}

/// One window that applies to a day, with the resource it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct ResourceWindow<'a> {
    pub resource: Option<&'a Resource>,
    pub window: WorkingWindow,
}

#[derive(Debug, Clone)]
pub struct SchedulingPolicy {
    pub time_zone: Tz,
    pub step: Duration,
    pub durations: Vec<i64>,
    pub excluded_weekdays: Vec<Weekday>,
    pub horizon: BookingHorizon,
    /// Used when no resources are configured.
    pub default_hours: WeeklyHours,
    pub resources: Vec<Resource>,
}

impl SchedulingPolicy {
    pub fn from_config(config: &BookingConfig) -> Result<Self, PolicyError> {
        let time_zone: Tz = config
            .time_zone
            .parse()
            .map_err(|_| PolicyError::InvalidTimeZone(config.time_zone.clone()))?;

        if config.slot_step_minutes <= 0 {
            return Err(PolicyError::InvalidStep(config.slot_step_minutes));
        }
        if config.durations.is_empty() {
            return Err(PolicyError::NoDurations);
        }
        if let Some(&bad) = config.durations.iter().find(|&&minutes| minutes <= 0) {
            return Err(PolicyError::InvalidDuration(bad));
        }
        if config.min_days_ahead < 0 || config.min_days_ahead > config.max_days_ahead {
            return Err(PolicyError::InvalidHorizon {
                min: config.min_days_ahead,
                max: config.max_days_ahead,
            });
        }

        let excluded_weekdays = config
            .excluded_weekdays
            .iter()
            .map(|name| parse_weekday(name))
            .collect::<Result<Vec<_>, _>>()?;

        let mut resources: Vec<Resource> = Vec::with_capacity(config.staff.len());
        for staff in &config.staff {
            let id = staff.id.trim();
            if id.is_empty() {
                return Err(PolicyError::EmptyResourceId);
            }
            if resources.iter().any(|known| known.id == id) {
                return Err(PolicyError::DuplicateResource(id.to_string()));
            }
            resources.push(Resource {
                id: id.to_string(),
                name: staff.name.clone().unwrap_or_else(|| id.to_string()),
                calendar_id: staff.calendar_id.clone(),
                hours: WeeklyHours::from_config(id, &staff.hours)?,
            });
        }

        Ok(Self {
            time_zone,
            step: Duration::minutes(config.slot_step_minutes),
            durations: config.durations.clone(),
            excluded_weekdays,
            horizon: BookingHorizon {
                min_days_ahead: config.min_days_ahead,
                max_days_ahead: config.max_days_ahead,
            },
            default_hours: WeeklyHours::from_config("opening hours", &config.hours)?,
            resources,
        })
    }

    /// The requested duration, if it is one of the bookable durations.
    pub fn requested_duration(&self, minutes: i64) -> Option<Duration> {
        self.durations
            .contains(&minutes)
            .then(|| Duration::minutes(minutes))
    }

    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|resource| resource.id == id)
    }

    /// The windows that apply to `date` for `selector`. Empty when the day is closed.
    pub fn windows_for(
        &self,
        date: NaiveDate,
        selector: &ResourceSelector,
    ) -> Result<Vec<ResourceWindow<'_>>, UnknownResource> {
        let candidates: Vec<(Option<&Resource>, &WeeklyHours)> = match selector {
            ResourceSelector::Specific(id) => {
                let resource = self
                    .resource(id)
                    .ok_or_else(|| UnknownResource(id.clone()))?;
                vec![(Some(resource), &resource.hours)]
            }
            ResourceSelector::Any if self.resources.is_empty() => {
                vec![(None, &self.default_hours)]
            }
            ResourceSelector::Any => self
                .resources
                .iter()
                .map(|resource| (Some(resource), &resource.hours))
                .collect(),
        };

        let weekday = date.weekday();
        if self.excluded_weekdays.contains(&weekday) {
            return Ok(Vec::new());
        }

        Ok(candidates
            .into_iter()
            .filter_map(|(resource, hours)| {
                hours
                    .window(weekday)
                    .map(|window| ResourceWindow { resource, window })
            })
            .collect())
    }

    /// True when `date` is inside the horizon and at least one window is open.
    pub fn is_bookable_day(
        &self,
        date: NaiveDate,
        today: NaiveDate,
        selector: &ResourceSelector,
    ) -> Result<bool, UnknownResource> {
        let windows = self.windows_for(date, selector)?;
        Ok(self.horizon.contains(date, today) && !windows.is_empty())
    }

    /// Local wall-clock time to an absolute instant. `None` for times skipped by DST.
    pub fn to_instant(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        self.time_zone
            .from_local_datetime(&date.and_time(time))
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    }

    /// The whole civil day `[00:00, next 00:00)` in absolute time.
    pub fn day_bounds(&self, date: NaiveDate) -> Option<TimeInterval> {
        let start = self.to_instant(date, NaiveTime::MIN)?;
        let end = self.to_instant(date.succ_opt()?, NaiveTime::MIN)?;
        TimeInterval::new(start, end).ok()
    }

    /// Today's date in the policy zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.time_zone).date_naive()
    }
}

pub(crate) fn parse_hhmm(value: &str) -> Result<NaiveTime, PolicyError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| PolicyError::InvalidTime(value.to_string()))
}

fn parse_weekday(value: &str) -> Result<Weekday, PolicyError> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| PolicyError::InvalidWeekday(value.to_string()))
}
