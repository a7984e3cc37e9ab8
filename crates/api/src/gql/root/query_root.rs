use async_graphql::MergedObject;

use crate::gql::domains::cache::CacheQuery;
use crate::gql::domains::reservations::ReservationQuery;
use crate::gql::domains::restaurants::RestaurantQuery;
use crate::gql::domains::reviews::ReviewQuery;
use crate::gql::domains::search::SearchQuery;

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    CacheQuery,
    ReservationQuery,
    RestaurantQuery,
    ReviewQuery,
    SearchQuery,
);
