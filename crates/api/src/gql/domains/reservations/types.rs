use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, Enum, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::gql::domains::restaurants::types::RestaurantRef;
use crate::gql::error::ResultExt;
use crate::gql::loaders::{CustomerLoader, RestaurantLoader};
use infra::availability::Slot as EngineSlot;
use infra::models::{CustomerRow, ReservationRow};
use infra::repos::{NewCustomer, ReservationStatus as InfraReservationStatus};

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum ReservationStatus {
    /// Requested, holds covers until confirmed or cancelled
    Pending,

    /// Accepted by the restaurant
    Confirmed,

    /// Released; no longer counts against capacity
    Cancelled,
}

impl From<InfraReservationStatus> for ReservationStatus {
    fn from(status: InfraReservationStatus) -> Self {
        match status {
            InfraReservationStatus::Pending => ReservationStatus::Pending,
            InfraReservationStatus::Confirmed => ReservationStatus::Confirmed,
            InfraReservationStatus::Cancelled => ReservationStatus::Cancelled,
        }
    }
}

impl From<ReservationStatus> for InfraReservationStatus {
    fn from(status: ReservationStatus) -> Self {
        match status {
            ReservationStatus::Pending => InfraReservationStatus::Pending,
            ReservationStatus::Confirmed => InfraReservationStatus::Confirmed,
            ReservationStatus::Cancelled => InfraReservationStatus::Cancelled,
        }
    }
}

/// A bookable 30-minute start time.
#[derive(SimpleObject, Clone, Debug)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Covers still free for a standard-length booking starting here.
    pub available: i32,
}

impl From<EngineSlot> for Slot {
    fn from(slot: EngineSlot) -> Self {
        Self {
            start: slot.start,
            end: slot.end,
            available: slot.available,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct Reservation {
    pub id: ID,
    pub restaurant_id: ID,
    pub customer_id: ID,
    pub course_id: Option<ID>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub duration_min: i32,
    pub party_size: i32,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[ComplexObject]
impl Reservation {
    async fn restaurant(&self, ctx: &Context<'_>) -> Result<Option<RestaurantRef>> {
        let loader = ctx.data::<DataLoader<RestaurantLoader>>()?;
        let restaurant_id =
            Uuid::parse_str(self.restaurant_id.as_str()).gql_err("Invalid restaurant ID")?;

        match loader.load_one(restaurant_id).await {
            Ok(Some(row)) => Ok(Some(RestaurantRef::from(row))),
            Ok(None) => Ok(None),
            Err(e) => Err(async_graphql::Error::new(e.to_string())),
        }
    }

    async fn customer(&self, ctx: &Context<'_>) -> Result<Option<Customer>> {
        let loader = ctx.data::<DataLoader<CustomerLoader>>()?;
        let customer_id =
            Uuid::parse_str(self.customer_id.as_str()).gql_err("Invalid customer ID")?;

        match loader.load_one(customer_id).await {
            Ok(Some(row)) => Ok(Some(Customer::from(row))),
            Ok(None) => Ok(None),
            Err(e) => Err(async_graphql::Error::new(e.to_string())),
        }
    }
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Self {
            id: row.id.into(),
            restaurant_id: row.restaurant_id.into(),
            customer_id: row.customer_id.into(),
            course_id: row.course_id.map(Into::into),
            starts_at: row.starts_at,
            ends_at: row.ends_at(),
            duration_min: row.duration_min,
            party_size: row.party_size,
            status: row.status.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct Customer {
    pub id: ID,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            email: row.email,
            phone: row.phone,
        }
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct CustomerInput {
    pub name: String,
    #[graphql(default)]
    pub email: String,
    #[graphql(default)]
    pub phone: String,
}

impl From<CustomerInput> for NewCustomer {
    fn from(input: CustomerInput) -> Self {
        Self {
            name: input.name,
            email: input.email,
            phone: input.phone,
        }
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct CreateReservationInput {
    pub restaurant_id: Uuid,
    /// RFC 3339 timestamp, e.g. `2025-03-12T19:00:00+05:45`.
    pub starts_at: String,
    /// Defaults to 90 minutes.
    pub duration_min: Option<i32>,
    pub party_size: i32,
    pub course_id: Option<Uuid>,
    pub customer: CustomerInput,
}

#[derive(InputObject, Clone, Debug, Default)]
pub struct ReservationFilterInput {
    pub restaurant_id: Option<Uuid>,
    pub status: Option<ReservationStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}
