use async_graphql::{InputObject, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use infra::models::ReviewRow;

#[derive(SimpleObject, Clone, Debug)]
pub struct Review {
    pub id: ID,
    pub restaurant_id: ID,
    pub customer_id: Option<ID>,
    pub customer_name: String,
    pub rating: i32,
    pub title: String,
    pub comment: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id.into(),
            restaurant_id: row.restaurant_id.into(),
            customer_id: row.customer_id.map(Into::into),
            customer_name: row.customer_name,
            rating: row.rating,
            title: row.title,
            comment: row.comment,
            is_approved: row.is_approved,
            created_at: row.created_at,
        }
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct CreateReviewInput {
    pub restaurant_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    /// 1 to 5
    pub rating: i32,
    #[graphql(default)]
    pub title: String,
    #[graphql(default)]
    pub comment: String,
}
