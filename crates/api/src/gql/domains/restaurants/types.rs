use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::gql::error::GqlError;
use crate::state::AppState;
use infra::models::{OpeningHourRow, RestaurantListingRow, RestaurantRow};
use infra::repos::opening_hours;

#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct Restaurant {
    pub id: ID,
    pub slug: String,
    pub name: String,
    pub slogan: String,
    pub place: String,
    /// Cuisine
    pub genre: String,
    pub budget: String,
    pub title: String,
    pub description: String,
    pub area: String,
    pub address: String,
    pub phone: String,
    /// IANA zone that opening hours are expressed in.
    pub timezone: String,
    /// Maximum simultaneous covers.
    pub capacity: i32,
    pub is_open: bool,
    /// Mean rating of approved reviews, 0 when there are none.
    pub avg_rating: f64,
    pub review_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[ComplexObject]
impl Restaurant {
    async fn opening_hours(&self, ctx: &Context<'_>) -> Result<Vec<OpeningHour>> {
        let state = ctx.data::<AppState>()?;
        let restaurant_id = Uuid::parse_str(self.id.as_str())?;

        let rows = opening_hours::list_by_restaurant(&state.db, restaurant_id)
            .await
            .map_err(GqlError::from)?;
        Ok(rows.into_iter().map(OpeningHour::from).collect())
    }
}

impl From<RestaurantListingRow> for Restaurant {
    fn from(row: RestaurantListingRow) -> Self {
        Self {
            id: row.id.into(),
            slug: row.slug,
            name: row.name,
            slogan: row.slogan,
            place: row.place,
            genre: row.genre,
            budget: row.budget,
            title: row.title,
            description: row.description,
            area: row.area,
            address: row.address,
            phone: row.phone,
            timezone: row.timezone,
            capacity: row.capacity,
            is_open: row.is_open,
            avg_rating: row.avg_rating,
            review_count: row.review_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Compact restaurant reference used when resolving a reservation's restaurant.
#[derive(SimpleObject, Clone, Debug)]
pub struct RestaurantRef {
    pub id: ID,
    pub slug: String,
    pub name: String,
    pub timezone: String,
    pub capacity: i32,
}

impl From<RestaurantRow> for RestaurantRef {
    fn from(row: RestaurantRow) -> Self {
        Self {
            id: row.id.into(),
            slug: row.slug,
            name: row.name,
            timezone: row.timezone,
            capacity: row.capacity,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct OpeningHour {
    pub id: ID,
    /// 0 = Sunday .. 6 = Saturday
    pub weekday: i32,
    pub open_time: String,
    pub close_time: String,
    pub is_closed: bool,
}

impl From<OpeningHourRow> for OpeningHour {
    fn from(row: OpeningHourRow) -> Self {
        Self {
            id: row.id.into(),
            weekday: row.weekday,
            open_time: row.open_time,
            close_time: row.close_time,
            is_closed: row.is_closed,
        }
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct OpeningHourInput {
    /// 0 = Sunday .. 6 = Saturday
    pub weekday: i32,
    /// Local time, `HH:MM`.
    pub open_time: String,
    /// Local time, `HH:MM`.
    pub close_time: String,
    #[graphql(default)]
    pub is_closed: bool,
}
