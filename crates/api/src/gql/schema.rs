use async_graphql::dataloader::DataLoader;
use async_graphql::{EmptySubscription, Schema};

use super::loaders::{CustomerLoader, RestaurantLoader};
use super::{MutationRoot, QueryRoot};
use crate::state::AppState;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the GraphQL schema and inject shared state (AppState) into the context.
pub fn build_schema(state: AppState) -> AppSchema {
    let restaurant_loader = DataLoader::new(RestaurantLoader::new(state.db.clone()), tokio::spawn);
    let customer_loader = DataLoader::new(CustomerLoader::new(state.db.clone()), tokio::spawn);

    let introspection_enabled = state.config().gql_introspection;

    let mut builder = Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(state) // AppState is Clone; available in resolvers via ctx.data::<AppState>()
    .data(restaurant_loader)
    .data(customer_loader)
    .limit_depth(15)
    .limit_complexity(200);

    if !introspection_enabled {
        builder = builder.disable_introspection();
    }

    builder.finish()
}
