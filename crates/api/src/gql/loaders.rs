use async_graphql::dataloader::Loader;
use infra::{db::Db, models::CustomerRow, models::RestaurantRow, repos::customers, repos::restaurants};
use std::{collections::HashMap, future::Future, sync::Arc};
use uuid::Uuid;

/// Batch-load restaurants by ID, e.g. for every reservation in a page.
#[derive(Clone)]
pub struct RestaurantLoader {
    pool: Db,
}

impl RestaurantLoader {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

impl Loader<Uuid> for RestaurantLoader {
    type Value = RestaurantRow;
    type Error = Arc<sqlx::Error>;

    fn load(
        &self,
        keys: &[Uuid],
    ) -> impl Future<Output = std::result::Result<HashMap<Uuid, Self::Value>, Self::Error>> + Send
    {
        let pool = self.pool.clone();
        let ids: Vec<Uuid> = keys.to_vec();

        async move {
            let rows = restaurants::get_by_ids(&pool, &ids)
                .await
                .map_err(Arc::new)?;

            Ok(rows.into_iter().map(|r| (r.id, r)).collect())
        }
    }
}

// CustomerLoader - batch load customers by ID
#[derive(Clone)]
pub struct CustomerLoader {
    pool: Db,
}

impl CustomerLoader {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

impl Loader<Uuid> for CustomerLoader {
    type Value = CustomerRow;
    type Error = Arc<sqlx::Error>;

    fn load(
        &self,
        keys: &[Uuid],
    ) -> impl Future<Output = std::result::Result<HashMap<Uuid, Self::Value>, Self::Error>> + Send
    {
        let pool = self.pool.clone();
        let ids: Vec<Uuid> = keys.to_vec();

        async move {
            let rows = customers::get_by_ids(&pool, &ids)
                .await
                .map_err(Arc::new)?;

            Ok(rows.into_iter().map(|r| (r.id, r)).collect())
        }
    }
}
