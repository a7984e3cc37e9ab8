//! Slot availability and reservation admission.
//!
//! Everything in this module is pure computation. Callers gather the
//! restaurant, its opening hour for the day and the reservations around the
//! window of interest, then ask the engine. The same overlap predicate
//! ([`TimeWindow::overlaps`]) backs both slot listing and admission so the two
//! can never disagree about what "overlapping" means.

mod admission;
mod slots;

pub use admission::{check_and_admit, Admission};
pub use slots::{generate_slots, parse_hhmm, Slot, SlotIter, SlotSchedule};

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use crate::models::ReservationRow;
use crate::repos::reservations::ReservationStatus;

/// Width of every generated slot.
pub const SLOT_WIDTH_MINUTES: i64 = 30;
/// Dine time assumed when reporting slot availability, whatever the real
/// reservation durations are.
pub const PROBE_DURATION_MINUTES: i64 = 90;
/// Duration used for new reservations when the caller does not give one.
pub const DEFAULT_DURATION_MINUTES: i32 = 90;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("invalid restaurant timezone: {0:?}")]
    InvalidTimezone(String),
}

/// Resolve an IANA zone name. Missing or unknown zones are an error; there is
/// no fallback to UTC.
pub fn resolve_timezone(name: &str) -> Result<Tz, AvailabilityError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AvailabilityError::InvalidTimezone(name.to_string()));
    }
    trimmed
        .parse::<Tz>()
        .map_err(|_| AvailabilityError::InvalidTimezone(name.to_string()))
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn starting_at(start: DateTime<Utc>, minutes: i64) -> Self {
        Self {
            start,
            end: start + Duration::minutes(minutes),
        }
    }

    /// Strict overlap: windows that only touch at an edge do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// The engine's view of a stored reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Booking {
    pub window: TimeWindow,
    pub party_size: i32,
    pub status: ReservationStatus,
}

impl Booking {
    pub fn new(
        starts_at: DateTime<Utc>,
        duration_min: i32,
        party_size: i32,
        status: ReservationStatus,
    ) -> Self {
        Self {
            window: TimeWindow::starting_at(starts_at, duration_min as i64),
            party_size,
            status,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

impl From<&ReservationRow> for Booking {
    fn from(row: &ReservationRow) -> Self {
        Booking::new(row.starts_at, row.duration_min, row.party_size, row.status)
    }
}

/// Covers held by active bookings that overlap `window`.
pub fn covers_in<'a, I>(window: &TimeWindow, bookings: I) -> i64
where
    I: IntoIterator<Item = &'a Booking>,
{
    bookings
        .into_iter()
        .filter(|b| b.is_active() && b.window.overlaps(window))
        .map(|b| b.party_size as i64)
        .sum()
}
