use super::{covers_in, Booking, TimeWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted {
        used: i64,
    },
    Rejected {
        used: i64,
        requested: i32,
        capacity: i32,
    },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted { .. })
    }
}

/// Decide whether `party_size` more covers fit in `window`.
///
/// Every active booking that overlaps the window counts in full, so an
/// admitted request can never push the load above `capacity` at any instant
/// inside the window.
pub fn check_and_admit(
    capacity: i32,
    window: TimeWindow,
    party_size: i32,
    bookings: &[Booking],
) -> Admission {
    let used = covers_in(&window, bookings);
    if used + party_size as i64 <= capacity as i64 {
        Admission::Admitted { used }
    } else {
        Admission::Rejected {
            used,
            requested: party_size,
            capacity,
        }
    }
}
