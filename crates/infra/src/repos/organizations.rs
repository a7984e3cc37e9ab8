use sqlx::{PgExecutor, Result as SqlxResult};

use crate::models::OrganizationRow;

pub async fn create<'e>(executor: impl PgExecutor<'e>, name: &str) -> SqlxResult<OrganizationRow> {
    sqlx::query_as::<_, OrganizationRow>(
        r#"
        INSERT INTO organizations (name)
        VALUES ($1)
        RETURNING id, name, subscription_status, created_at
        "#,
    )
    .bind(name)
    .fetch_one(executor)
    .await
}
