use async_graphql::{Context, Object, Result};
use tracing::info;
use uuid::Uuid;

use super::types::{OpeningHour, OpeningHourInput, Restaurant};
use crate::gql::error::GqlError;
use crate::state::AppState;
use infra::availability::parse_hhmm;
use infra::repos::{opening_hours, restaurants, UpsertOpeningHour};

#[derive(Default)]
pub struct RestaurantQuery;

#[Object]
impl RestaurantQuery {
    /// Restaurant detail by slug. Always read from the database.
    async fn restaurant(&self, ctx: &Context<'_>, slug: String) -> Result<Option<Restaurant>> {
        let state = ctx.data::<AppState>()?;
        let row = restaurants::get_listing_by_slug(&state.db, slug.trim())
            .await
            .map_err(GqlError::from)?;
        Ok(row.map(Restaurant::from))
    }
}

#[derive(Default)]
pub struct RestaurantMutation;

#[Object]
impl RestaurantMutation {
    /// Replace the opening hours for the given weekdays. Weekdays not listed are left alone.
    async fn set_opening_hours(
        &self,
        ctx: &Context<'_>,
        restaurant_id: Uuid,
        hours: Vec<OpeningHourInput>,
    ) -> Result<Vec<OpeningHour>> {
        let state = ctx.data::<AppState>()?;

        for h in &hours {
            if !(0..=6).contains(&h.weekday) {
                return Err(GqlError::new(format!(
                    "weekday must be between 0 (Sunday) and 6 (Saturday), got {}",
                    h.weekday
                ))
                .into());
            }
            if !h.is_closed {
                let (Some(open), Some(close)) = (parse_hhmm(&h.open_time), parse_hhmm(&h.close_time))
                else {
                    return Err(GqlError::new("opening times must be HH:MM").into());
                };
                if open >= close {
                    return Err(GqlError::new("openTime must be before closeTime").into());
                }
            }
        }

        restaurants::get_by_id(&state.db, restaurant_id)
            .await
            .map_err(GqlError::from)?
            .ok_or_else(|| GqlError::new("Restaurant not found"))?;

        let mut tx = state.db.begin().await.map_err(GqlError::from)?;
        let mut saved = Vec::with_capacity(hours.len());
        for h in hours {
            let row = opening_hours::upsert(
                &mut *tx,
                UpsertOpeningHour {
                    restaurant_id,
                    weekday: h.weekday,
                    open_time: h.open_time.trim().to_string(),
                    close_time: h.close_time.trim().to_string(),
                    is_closed: h.is_closed,
                },
            )
            .await
            .map_err(GqlError::from)?;
            saved.push(OpeningHour::from(row));
        }
        tx.commit().await.map_err(GqlError::from)?;

        info!(
            "Updated {} opening hour rows for restaurant {}",
            saved.len(),
            restaurant_id
        );
        Ok(saved)
    }
}
