use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::OpeningHourRow;

#[derive(Debug, Clone)]
pub struct UpsertOpeningHour {
    pub restaurant_id: Uuid,
    pub weekday: i32,
    pub open_time: String,
    pub close_time: String,
    pub is_closed: bool,
}

pub async fn get_for_weekday<'e>(
    executor: impl PgExecutor<'e>,
    restaurant_id: Uuid,
    weekday: i32,
) -> SqlxResult<Option<OpeningHourRow>> {
    sqlx::query_as::<_, OpeningHourRow>(
        r#"
        SELECT id, restaurant_id, weekday, open_time, close_time, is_closed
        FROM opening_hours
        WHERE restaurant_id = $1 AND weekday = $2
        "#,
    )
    .bind(restaurant_id)
    .bind(weekday)
    .fetch_optional(executor)
    .await
}

pub async fn list_by_restaurant<'e>(
    executor: impl PgExecutor<'e>,
    restaurant_id: Uuid,
) -> SqlxResult<Vec<OpeningHourRow>> {
    sqlx::query_as::<_, OpeningHourRow>(
        r#"
        SELECT id, restaurant_id, weekday, open_time, close_time, is_closed
        FROM opening_hours
        WHERE restaurant_id = $1
        ORDER BY weekday ASC
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(executor)
    .await
}

/// One row per (restaurant, weekday); writing a weekday again replaces it.
pub async fn upsert<'e>(
    executor: impl PgExecutor<'e>,
    data: UpsertOpeningHour,
) -> SqlxResult<OpeningHourRow> {
    sqlx::query_as::<_, OpeningHourRow>(
        r#"
        INSERT INTO opening_hours (restaurant_id, weekday, open_time, close_time, is_closed)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (restaurant_id, weekday) DO UPDATE SET
            open_time = EXCLUDED.open_time,
            close_time = EXCLUDED.close_time,
            is_closed = EXCLUDED.is_closed
        RETURNING id, restaurant_id, weekday, open_time, close_time, is_closed
        "#,
    )
    .bind(data.restaurant_id)
    .bind(data.weekday)
    .bind(data.open_time)
    .bind(data.close_time)
    .bind(data.is_closed)
    .fetch_one(executor)
    .await
}
