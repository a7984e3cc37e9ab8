use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::CourseRow;

#[derive(Debug, Clone)]
pub struct CreateCourse {
    pub restaurant_id: Uuid,
    pub title: String,
    pub description: String,
    pub course_price: i32,
    pub stay_time: i32,
}

const COURSE_COLUMNS: &str = r#"
    id, restaurant_id, title, description, course_price, stay_time, created_at, updated_at
"#;

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: &CreateCourse,
) -> SqlxResult<CourseRow> {
    let sql = format!(
        r#"
        INSERT INTO courses (restaurant_id, title, description, course_price, stay_time)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {COURSE_COLUMNS}
        "#
    );
    sqlx::query_as::<_, CourseRow>(&sql)
        .bind(data.restaurant_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.course_price)
        .bind(data.stay_time)
        .fetch_one(executor)
        .await
}

/// A course only counts when it belongs to the given restaurant.
pub async fn get_for_restaurant<'e>(
    executor: impl PgExecutor<'e>,
    restaurant_id: Uuid,
    course_id: Uuid,
) -> SqlxResult<Option<CourseRow>> {
    let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1 AND restaurant_id = $2");
    sqlx::query_as::<_, CourseRow>(&sql)
        .bind(course_id)
        .bind(restaurant_id)
        .fetch_optional(executor)
        .await
}
