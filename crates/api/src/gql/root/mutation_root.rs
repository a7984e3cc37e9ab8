use async_graphql::MergedObject;

use crate::gql::domains::cache::CacheMutation;
use crate::gql::domains::reservations::ReservationMutation;
use crate::gql::domains::restaurants::RestaurantMutation;
use crate::gql::domains::reviews::ReviewMutation;

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    CacheMutation,
    ReservationMutation,
    RestaurantMutation,
    ReviewMutation,
);
