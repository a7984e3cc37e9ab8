use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use super::types::{CreateReviewInput, Review};
use crate::gql::error::GqlError;
use crate::state::AppState;
use infra::repos::{restaurants, reviews, CreateReview};

#[derive(Default)]
pub struct ReviewQuery;

#[Object]
impl ReviewQuery {
    /// Approved reviews for a restaurant, newest first.
    async fn restaurant_reviews(
        &self,
        ctx: &Context<'_>,
        restaurant_id: Uuid,
    ) -> Result<Vec<Review>> {
        let state = ctx.data::<AppState>()?;
        let rows = reviews::list_approved_by_restaurant(&state.db, restaurant_id)
            .await
            .map_err(GqlError::from)?;
        Ok(rows.into_iter().map(Review::from).collect())
    }
}

#[derive(Default)]
pub struct ReviewMutation;

#[Object]
impl ReviewMutation {
    /// Submit a review. It is hidden until approved.
    async fn create_review(&self, ctx: &Context<'_>, input: CreateReviewInput) -> Result<Review> {
        let state = ctx.data::<AppState>()?;

        if !(1..=5).contains(&input.rating) {
            return Err(GqlError::new("rating must be between 1 and 5").into());
        }
        let customer_name = input.customer_name.trim().to_string();
        if customer_name.is_empty() {
            return Err(GqlError::new("customerName is required").into());
        }

        restaurants::get_by_id(&state.db, input.restaurant_id)
            .await
            .map_err(GqlError::from)?
            .ok_or_else(|| GqlError::new("Restaurant not found"))?;

        let row = reviews::create(
            &state.db,
            CreateReview {
                restaurant_id: input.restaurant_id,
                customer_id: input.customer_id,
                customer_name,
                rating: input.rating,
                title: input.title.trim().to_string(),
                comment: input.comment.trim().to_string(),
            },
        )
        .await
        .map_err(GqlError::from)?;

        Ok(Review::from(row))
    }

    async fn approve_review(&self, ctx: &Context<'_>, id: Uuid) -> Result<Review> {
        let state = ctx.data::<AppState>()?;
        let row = reviews::approve(&state.db, id)
            .await
            .map_err(GqlError::from)?
            .ok_or_else(|| GqlError::new("Review not found"))?;
        Ok(Review::from(row))
    }
}
