use crate::repos::reservations::ReservationStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrganizationRow {
    pub id: Uuid,
    pub name: String,
    pub subscription_status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RestaurantRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub slug: String,
    pub name: String,
    pub slogan: String,
    pub place: String,
    pub genre: String,
    pub budget: String,
    pub title: String,
    pub description: String,
    pub area: String,
    pub address: String,
    pub phone: String,
    pub timezone: String,
    pub capacity: i32,
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Restaurant row joined with its approved-review aggregate.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RestaurantListingRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub slug: String,
    pub name: String,
    pub slogan: String,
    pub place: String,
    pub genre: String,
    pub budget: String,
    pub title: String,
    pub description: String,
    pub area: String,
    pub address: String,
    pub phone: String,
    pub timezone: String,
    pub capacity: i32,
    pub is_open: bool,
    pub avg_rating: f64,
    pub review_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OpeningHourRow {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub weekday: i32, // 0 = Sunday .. 6 = Saturday
    pub open_time: String,
    pub close_time: String,
    pub is_closed: bool,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CustomerRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CourseRow {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub title: String,
    pub description: String,
    pub course_price: i32,
    pub stay_time: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ReservationRow {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub customer_id: Uuid,
    pub course_id: Option<Uuid>,
    pub starts_at: DateTime<Utc>,
    pub duration_min: i32,
    pub party_size: i32,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReservationRow {
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at + chrono::Duration::minutes(self.duration_min as i64)
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ReviewRow {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub rating: i32,
    pub title: String,
    pub comment: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
