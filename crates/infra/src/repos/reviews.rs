use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::ReviewRow;

#[derive(Debug, Clone)]
pub struct CreateReview {
    pub restaurant_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub rating: i32,
    pub title: String,
    pub comment: String,
}

/// New reviews start unapproved and stay out of ratings until approved.
pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateReview,
) -> SqlxResult<ReviewRow> {
    sqlx::query_as::<_, ReviewRow>(
        r#"
        INSERT INTO reviews (restaurant_id, customer_id, customer_name, rating, title, comment)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, restaurant_id, customer_id, customer_name, rating, title, comment,
                  is_approved, created_at, updated_at
        "#,
    )
    .bind(data.restaurant_id)
    .bind(data.customer_id)
    .bind(data.customer_name)
    .bind(data.rating)
    .bind(data.title)
    .bind(data.comment)
    .fetch_one(executor)
    .await
}

pub async fn approve<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<ReviewRow>> {
    sqlx::query_as::<_, ReviewRow>(
        r#"
        UPDATE reviews
        SET is_approved = true, updated_at = NOW()
        WHERE id = $1
        RETURNING id, restaurant_id, customer_id, customer_name, rating, title, comment,
                  is_approved, created_at, updated_at
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn list_approved_by_restaurant<'e>(
    executor: impl PgExecutor<'e>,
    restaurant_id: Uuid,
) -> SqlxResult<Vec<ReviewRow>> {
    sqlx::query_as::<_, ReviewRow>(
        r#"
        SELECT id, restaurant_id, customer_id, customer_name, rating, title, comment,
               is_approved, created_at, updated_at
        FROM reviews
        WHERE restaurant_id = $1 AND is_approved = true
        ORDER BY created_at DESC
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(executor)
    .await
}
