use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool, Result as SqlxResult};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::availability::{
    check_and_admit, resolve_timezone, Admission, AvailabilityError, Booking, TimeWindow,
};
use crate::models::ReservationRow;
use crate::pagination::LimitOffset;
use crate::repos::courses;
use crate::repos::customers::{self, NewCustomer};
use crate::repos::restaurants;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, serde::Serialize, serde::Deserialize,
)]
#[sqlx(type_name = "reservation_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "PENDING",
            ReservationStatus::Confirmed => "CONFIRMED",
            ReservationStatus::Cancelled => "CANCELLED",
        }
    }

    /// Pending and confirmed reservations hold covers; cancelled ones don't.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        )
    }

    /// Cancelled is terminal. Re-activating a reservation would bypass the
    /// capacity check, so it is never allowed.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        matches!(
            (self, next),
            (ReservationStatus::Pending, ReservationStatus::Confirmed)
                | (ReservationStatus::Pending, ReservationStatus::Cancelled)
                | (ReservationStatus::Confirmed, ReservationStatus::Cancelled)
        )
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ReservationStatus::Pending),
            "CONFIRMED" => Ok(ReservationStatus::Confirmed),
            "CANCELLED" => Ok(ReservationStatus::Cancelled),
            _ => Err(format!("Unknown reservation status: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewReservation {
    pub restaurant_id: Uuid,
    pub customer: NewCustomer,
    pub course_id: Option<Uuid>,
    pub starts_at: DateTime<Utc>,
    pub duration_min: i32,
    pub party_size: i32,
}

impl NewReservation {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::starting_at(self.starts_at, self.duration_min as i64)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub restaurant_id: Option<Uuid>,
    pub status: Option<ReservationStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum AdmitError {
    #[error("database error")]
    Db(#[from] sqlx::Error),

    #[error("restaurant {0} not found")]
    RestaurantNotFound(Uuid),

    #[error("course {0} not found for this restaurant")]
    CourseNotFound(Uuid),

    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error("restaurant is full at that time ({used} of {capacity} covers taken, {requested} requested)")]
    CapacityExceeded {
        used: i64,
        requested: i32,
        capacity: i32,
    },
}

/// Check capacity and insert a PENDING reservation as one unit.
///
/// The restaurant row is locked for the whole transaction, which serializes
/// concurrent admissions for the same restaurant: no other admission can
/// read the overlapping reservations until this one commits or rolls back.
/// A rejected request leaves nothing behind, not even the customer row.
pub async fn admit(pool: &PgPool, data: NewReservation) -> Result<ReservationRow, AdmitError> {
    let mut tx = pool.begin().await?;

    let restaurant = restaurants::get_for_update(&mut *tx, data.restaurant_id)
        .await?
        .ok_or(AdmitError::RestaurantNotFound(data.restaurant_id))?;
    resolve_timezone(&restaurant.timezone)?;

    if let Some(course_id) = data.course_id {
        if courses::get_for_restaurant(&mut *tx, data.restaurant_id, course_id)
            .await?
            .is_none()
        {
            tx.rollback().await?;
            return Err(AdmitError::CourseNotFound(course_id));
        }
    }

    let window = data.window();
    let overlapping = list_active_in_window(&mut *tx, data.restaurant_id, window).await?;
    let bookings: Vec<Booking> = overlapping.iter().map(Booking::from).collect();

    if let Admission::Rejected {
        used,
        requested,
        capacity,
    } = check_and_admit(restaurant.capacity, window, data.party_size, &bookings)
    {
        tx.rollback().await?;
        return Err(AdmitError::CapacityExceeded {
            used,
            requested,
            capacity,
        });
    }

    let customer = customers::find_or_create(&mut *tx, &data.customer).await?;
    let row = insert(&mut *tx, &data, customer.id).await?;

    tx.commit().await?;
    Ok(row)
}

async fn insert<'e>(
    executor: impl PgExecutor<'e>,
    data: &NewReservation,
    customer_id: Uuid,
) -> SqlxResult<ReservationRow> {
    sqlx::query_as::<_, ReservationRow>(
        r#"
        INSERT INTO reservations (restaurant_id, customer_id, course_id, starts_at, duration_min, party_size, status)
        VALUES ($1, $2, $3, $4, $5, $6, 'PENDING')
        RETURNING id, restaurant_id, customer_id, course_id, starts_at, duration_min, party_size,
                  status, created_at, updated_at
        "#,
    )
    .bind(data.restaurant_id)
    .bind(customer_id)
    .bind(data.course_id)
    .bind(data.starts_at)
    .bind(data.duration_min)
    .bind(data.party_size)
    .fetch_one(executor)
    .await
}

/// Active (pending or confirmed) reservations overlapping `window`.
pub async fn list_active_in_window<'e>(
    executor: impl PgExecutor<'e>,
    restaurant_id: Uuid,
    window: TimeWindow,
) -> SqlxResult<Vec<ReservationRow>> {
    sqlx::query_as::<_, ReservationRow>(
        r#"
        SELECT id, restaurant_id, customer_id, course_id, starts_at, duration_min, party_size,
               status, created_at, updated_at
        FROM reservations
        WHERE restaurant_id = $1
          AND status IN ('PENDING', 'CONFIRMED')
          AND starts_at < $3
          AND starts_at + make_interval(mins => duration_min) > $2
        ORDER BY starts_at ASC
        "#,
    )
    .bind(restaurant_id)
    .bind(window.start)
    .bind(window.end)
    .fetch_all(executor)
    .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<ReservationRow>> {
    sqlx::query_as::<_, ReservationRow>(
        r#"
        SELECT id, restaurant_id, customer_id, course_id, starts_at, duration_min, party_size,
               status, created_at, updated_at
        FROM reservations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &ReservationFilter,
    page: Option<LimitOffset>,
) -> SqlxResult<Vec<ReservationRow>> {
    let p = page.unwrap_or_default();

    sqlx::query_as::<_, ReservationRow>(
        r#"
        SELECT id, restaurant_id, customer_id, course_id, starts_at, duration_min, party_size,
               status, created_at, updated_at
        FROM reservations
        WHERE ($1::uuid IS NULL OR restaurant_id = $1)
          AND ($2::reservation_status IS NULL OR status = $2)
          AND ($3::timestamptz IS NULL OR starts_at >= $3)
          AND ($4::timestamptz IS NULL OR starts_at <= $4)
        ORDER BY starts_at DESC, id ASC
        LIMIT $5 OFFSET $6
        "#,
    )
    .bind(filter.restaurant_id)
    .bind(filter.status)
    .bind(filter.from)
    .bind(filter.to)
    .bind(p.limit)
    .bind(p.offset)
    .fetch_all(executor)
    .await
}

pub async fn count<'e>(
    executor: impl PgExecutor<'e>,
    filter: &ReservationFilter,
) -> SqlxResult<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM reservations
        WHERE ($1::uuid IS NULL OR restaurant_id = $1)
          AND ($2::reservation_status IS NULL OR status = $2)
          AND ($3::timestamptz IS NULL OR starts_at >= $3)
          AND ($4::timestamptz IS NULL OR starts_at <= $4)
        "#,
    )
    .bind(filter.restaurant_id)
    .bind(filter.status)
    .bind(filter.from)
    .bind(filter.to)
    .fetch_one(executor)
    .await
}

/// Move a reservation from `expected` to `next`. Returns `None` when the row
/// is missing or its status changed underneath the caller.
pub async fn update_status<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    expected: ReservationStatus,
    next: ReservationStatus,
) -> SqlxResult<Option<ReservationRow>> {
    sqlx::query_as::<_, ReservationRow>(
        r#"
        UPDATE reservations
        SET status = $3, updated_at = NOW()
        WHERE id = $1 AND status = $2
        RETURNING id, restaurant_id, customer_id, course_id, starts_at, duration_min, party_size,
                  status, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(expected)
    .bind(next)
    .fetch_optional(executor)
    .await
}
