use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::{
    covers_in, resolve_timezone, AvailabilityError, Booking, TimeWindow, PROBE_DURATION_MINUTES,
    SLOT_WIDTH_MINUTES,
};
use crate::models::OpeningHourRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: i32,
}

/// Parse an `HH:MM` wall-clock string.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// One day's slots for a restaurant.
///
/// Slots are produced lazily by [`SlotSchedule::iter`], which can be called
/// any number of times. A closed day is a schedule with no opening window.
#[derive(Debug, Clone)]
pub struct SlotSchedule {
    open: Option<TimeWindow>,
    capacity: i32,
    bookings: Vec<Booking>,
}

impl SlotSchedule {
    fn closed(capacity: i32) -> Self {
        Self {
            open: None,
            capacity,
            bookings: Vec::new(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.open.is_none()
    }

    /// Opening window in absolute time, if the restaurant opens that day.
    pub fn opening_window(&self) -> Option<TimeWindow> {
        self.open
    }

    pub fn iter(&self) -> SlotIter<'_> {
        SlotIter {
            schedule: self,
            next_start: self.open.map(|w| w.start),
        }
    }
}

impl<'a> IntoIterator for &'a SlotSchedule {
    type Item = Slot;
    type IntoIter = SlotIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct SlotIter<'a> {
    schedule: &'a SlotSchedule,
    next_start: Option<DateTime<Utc>>,
}

impl Iterator for SlotIter<'_> {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        let open = self.schedule.open?;
        let start = self.next_start?;
        let end = start + Duration::minutes(SLOT_WIDTH_MINUTES);
        if end > open.end {
            self.next_start = None;
            return None;
        }
        self.next_start = Some(end);

        let probe = TimeWindow::starting_at(start, PROBE_DURATION_MINUTES);
        let used = covers_in(&probe, &self.schedule.bookings);
        let available = (self.schedule.capacity as i64 - used).max(0) as i32;

        Some(Slot {
            start,
            end,
            available,
        })
    }
}

/// Build the slot schedule for `date`.
///
/// `hours` is the restaurant's opening-hour row for that weekday, if any.
/// Malformed or closed rows yield an empty schedule; only an unusable
/// timezone is reported as an error.
pub fn generate_slots(
    capacity: i32,
    timezone: &str,
    hours: Option<&OpeningHourRow>,
    date: NaiveDate,
    bookings: &[Booking],
) -> Result<SlotSchedule, AvailabilityError> {
    let tz = resolve_timezone(timezone)?;

    let Some(hours) = hours else {
        return Ok(SlotSchedule::closed(capacity));
    };
    if hours.is_closed {
        return Ok(SlotSchedule::closed(capacity));
    }
    if hours.weekday != date.weekday().num_days_from_sunday() as i32 {
        tracing::warn!(
            "Opening hour {} is for weekday {}, not {}; treating {} as closed",
            hours.id,
            hours.weekday,
            date.weekday(),
            date
        );
        return Ok(SlotSchedule::closed(capacity));
    }

    let Some(open) = local_window(tz, date, &hours.open_time, &hours.close_time) else {
        tracing::warn!(
            "Opening hour {} has an unusable window {:?}-{:?} on {}; treating as closed",
            hours.id,
            hours.open_time,
            hours.close_time,
            date
        );
        return Ok(SlotSchedule::closed(capacity));
    };
    if open.is_empty() {
        return Ok(SlotSchedule::closed(capacity));
    }

    Ok(SlotSchedule {
        open: Some(open),
        capacity,
        bookings: bookings.iter().filter(|b| b.is_active()).copied().collect(),
    })
}

fn local_window(tz: Tz, date: NaiveDate, open: &str, close: &str) -> Option<TimeWindow> {
    let start = local_instant(tz, date, parse_hhmm(open)?)?;
    let end = local_instant(tz, date, parse_hhmm(close)?)?;
    Some(TimeWindow::new(start, end))
}

// Ambiguous wall-clock times resolve to the earlier instant; times skipped by
// a DST transition do not exist and yield None.
fn local_instant(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    date.and_time(time)
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
