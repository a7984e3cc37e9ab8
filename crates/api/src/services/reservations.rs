use chrono::{Datelike, Duration, NaiveDate};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use infra::availability::{
    generate_slots, AvailabilityError, Booking, Slot, TimeWindow, DEFAULT_DURATION_MINUTES,
    PROBE_DURATION_MINUTES,
};
use infra::models::ReservationRow;
use infra::repos::{
    opening_hours, reservations, restaurants, AdmitError, NewCustomer, NewReservation,
    ReservationStatus,
};

#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("database error")]
    Db(#[from] sqlx::Error),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error("restaurant is full at that time")]
    CapacityExceeded {
        used: i64,
        requested: i32,
        capacity: i32,
    },

    #[error("cannot change reservation from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("reservation was modified concurrently, please retry")]
    Conflict,
}

impl From<AdmitError> for ReservationError {
    fn from(e: AdmitError) -> Self {
        match e {
            AdmitError::Db(e) => ReservationError::Db(e),
            AdmitError::RestaurantNotFound(_) => ReservationError::NotFound("Restaurant not found"),
            AdmitError::CourseNotFound(_) => ReservationError::NotFound("Course not found"),
            AdmitError::Availability(e) => ReservationError::Availability(e),
            AdmitError::CapacityExceeded {
                used,
                requested,
                capacity,
            } => ReservationError::CapacityExceeded {
                used,
                requested,
                capacity,
            },
        }
    }
}

/// Slots for one restaurant on one local date, in ascending order.
pub async fn available_slots(
    pool: &sqlx::PgPool,
    restaurant_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<Slot>, ReservationError> {
    let restaurant = restaurants::get_by_id(pool, restaurant_id)
        .await?
        .ok_or(ReservationError::NotFound("Restaurant not found"))?;

    let weekday = date.weekday().num_days_from_sunday() as i32;
    let hours = opening_hours::get_for_weekday(pool, restaurant_id, weekday).await?;

    // Resolve the opening window first so only reservations that can touch a
    // probe are loaded. The last probe starts one slot before close.
    let empty = generate_slots(
        restaurant.capacity,
        &restaurant.timezone,
        hours.as_ref(),
        date,
        &[],
    )?;
    let Some(open) = empty.opening_window() else {
        return Ok(Vec::new());
    };

    let span = TimeWindow::new(open.start, open.end + Duration::minutes(PROBE_DURATION_MINUTES));
    let rows = reservations::list_active_in_window(pool, restaurant_id, span).await?;
    let bookings: Vec<Booking> = rows.iter().map(Booking::from).collect();

    let schedule = generate_slots(
        restaurant.capacity,
        &restaurant.timezone,
        hours.as_ref(),
        date,
        &bookings,
    )?;
    Ok(schedule.iter().collect())
}

/// Parameters for a reservation request (parsed by the resolver).
pub struct CreateReservationParams {
    pub restaurant_id: Uuid,
    pub starts_at: String,
    pub duration_min: Option<i32>,
    pub party_size: i32,
    pub course_id: Option<Uuid>,
    pub customer: NewCustomer,
}

/// Validate the request and hand it to the atomic admission in storage.
pub async fn create_reservation(
    pool: &sqlx::PgPool,
    params: CreateReservationParams,
) -> Result<ReservationRow, ReservationError> {
    if params.party_size <= 0 {
        return Err(ReservationError::InvalidInput(
            "partySize must be at least 1".into(),
        ));
    }

    let duration_min = params.duration_min.unwrap_or(DEFAULT_DURATION_MINUTES);
    if duration_min <= 0 {
        return Err(ReservationError::InvalidInput(
            "durationMin must be at least 1".into(),
        ));
    }

    let starts_at = chrono::DateTime::parse_from_rfc3339(params.starts_at.trim())
        .map_err(|e| ReservationError::InvalidInput(format!("invalid startsAt: {e}")))?
        .with_timezone(&chrono::Utc);

    let customer = NewCustomer {
        name: params.customer.name.trim().to_string(),
        email: params.customer.email.trim().to_lowercase(),
        phone: params.customer.phone.trim().to_string(),
    };
    if customer.name.is_empty() {
        return Err(ReservationError::InvalidInput(
            "customer name is required".into(),
        ));
    }

    let request = NewReservation {
        restaurant_id: params.restaurant_id,
        customer,
        course_id: params.course_id,
        starts_at,
        duration_min,
        party_size: params.party_size,
    };

    match reservations::admit(pool, request).await {
        Ok(row) => {
            info!(
                "Reservation {} admitted for restaurant {} ({} covers at {})",
                row.id, row.restaurant_id, row.party_size, row.starts_at
            );
            Ok(row)
        }
        Err(e) => {
            if let AdmitError::CapacityExceeded {
                used,
                requested,
                capacity,
            } = &e
            {
                warn!(
                    "Rejected reservation for restaurant {}: {} used, {} requested, capacity {}",
                    params.restaurant_id, used, requested, capacity
                );
            }
            Err(e.into())
        }
    }
}

/// Apply a lifecycle transition. Setting the current status again is a no-op.
pub async fn update_status(
    pool: &sqlx::PgPool,
    id: Uuid,
    next: ReservationStatus,
) -> Result<ReservationRow, ReservationError> {
    let current = reservations::get_by_id(pool, id)
        .await?
        .ok_or(ReservationError::NotFound("Reservation not found"))?;

    if current.status == next {
        return Ok(current);
    }
    if !current.status.can_transition_to(next) {
        return Err(ReservationError::InvalidTransition {
            from: current.status.as_str(),
            to: next.as_str(),
        });
    }

    let updated = reservations::update_status(pool, id, current.status, next)
        .await?
        .ok_or(ReservationError::Conflict)?;

    info!(
        "Reservation {} moved from {} to {}",
        id,
        current.status.as_str(),
        next.as_str()
    );
    Ok(updated)
}
