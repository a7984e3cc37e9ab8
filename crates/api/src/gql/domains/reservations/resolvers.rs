use async_graphql::{Context, ErrorExtensions, Object, Result};
use chrono::NaiveDate;
use uuid::Uuid;

use super::types::{
    CreateReservationInput, Reservation, ReservationFilterInput, ReservationStatus, Slot,
};
use crate::gql::common::{PaginatedResponse, PaginationInput};
use crate::gql::error::GqlError;
use crate::services::reservations::{self as service, CreateReservationParams};
use crate::state::AppState;
use infra::repos::{reservations, ReservationFilter};

#[derive(Default)]
pub struct ReservationQuery;

#[Object]
impl ReservationQuery {
    /// Bookable slots for a restaurant on a local calendar date.
    /// Returns an empty list when the restaurant is closed that day.
    async fn available_slots(
        &self,
        ctx: &Context<'_>,
        restaurant_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Slot>> {
        let state = ctx.data::<AppState>()?;
        let slots = service::available_slots(&state.db, restaurant_id, date)
            .await
            .map_err(|e| e.extend())?;
        Ok(slots.into_iter().map(Slot::from).collect())
    }

    /// Reservations, newest first.
    async fn reservations(
        &self,
        ctx: &Context<'_>,
        filter: Option<ReservationFilterInput>,
        pagination: Option<PaginationInput>,
    ) -> Result<PaginatedResponse<Reservation>> {
        let state = ctx.data::<AppState>()?;
        let filter = filter.unwrap_or_default();
        let filter = ReservationFilter {
            restaurant_id: filter.restaurant_id,
            status: filter.status.map(Into::into),
            from: filter.from,
            to: filter.to,
        };

        let limit_offset = pagination.unwrap_or_default().to_limit_offset();

        let (rows, total_count) = tokio::try_join!(
            reservations::list(&state.db, &filter, Some(limit_offset)),
            reservations::count(&state.db, &filter)
        )
        .map_err(GqlError::from)?;

        let items: Vec<Reservation> = rows.into_iter().map(Reservation::from).collect();
        Ok(PaginatedResponse::new(items, total_count, limit_offset))
    }
}

#[derive(Default)]
pub struct ReservationMutation;

#[Object]
impl ReservationMutation {
    /// Request a table. Fails with code `CAPACITY_EXCEEDED` when the party
    /// does not fit, in which case nothing is written.
    async fn create_reservation(
        &self,
        ctx: &Context<'_>,
        input: CreateReservationInput,
    ) -> Result<Reservation> {
        let state = ctx.data::<AppState>()?;

        let params = CreateReservationParams {
            restaurant_id: input.restaurant_id,
            starts_at: input.starts_at,
            duration_min: input.duration_min,
            party_size: input.party_size,
            course_id: input.course_id,
            customer: input.customer.into(),
        };

        let row = service::create_reservation(&state.db, params)
            .await
            .map_err(|e| e.extend())?;
        Ok(Reservation::from(row))
    }

    async fn update_reservation_status(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        status: ReservationStatus,
    ) -> Result<Reservation> {
        let state = ctx.data::<AppState>()?;
        let row = service::update_status(&state.db, id, status.into())
            .await
            .map_err(|e| e.extend())?;
        Ok(Reservation::from(row))
    }
}
