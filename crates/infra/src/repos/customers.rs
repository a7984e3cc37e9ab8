use sqlx::{PgConnection, PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::CustomerRow;

#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

pub async fn get_by_ids<'e>(
    executor: impl PgExecutor<'e>,
    ids: &[Uuid],
) -> SqlxResult<Vec<CustomerRow>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, CustomerRow>(
        r#"
        SELECT id, name, email, phone, created_at
        FROM customers
        WHERE id = ANY($1::uuid[])
        "#,
    )
    .bind(ids)
    .fetch_all(executor)
    .await
}

pub async fn find_by_contact<'e>(
    executor: impl PgExecutor<'e>,
    email: &str,
    phone: &str,
) -> SqlxResult<Option<CustomerRow>> {
    sqlx::query_as::<_, CustomerRow>(
        r#"
        SELECT id, name, email, phone, created_at
        FROM customers
        WHERE email = $1 AND phone = $2
        "#,
    )
    .bind(email)
    .bind(phone)
    .fetch_optional(executor)
    .await
}

/// Inserts unless a customer with the same (email, phone) already exists.
/// Returns `None` on conflict; the unique index makes this race-free.
pub async fn insert_if_absent<'e>(
    executor: impl PgExecutor<'e>,
    data: &NewCustomer,
) -> SqlxResult<Option<CustomerRow>> {
    sqlx::query_as::<_, CustomerRow>(
        r#"
        INSERT INTO customers (name, email, phone)
        VALUES ($1, $2, $3)
        ON CONFLICT (email, phone) DO NOTHING
        RETURNING id, name, email, phone, created_at
        "#,
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .fetch_optional(executor)
    .await
}

/// Customers are identified by the (email, phone) pair they book with.
pub async fn find_or_create(
    conn: &mut PgConnection,
    data: &NewCustomer,
) -> SqlxResult<CustomerRow> {
    if let Some(existing) = find_by_contact(&mut *conn, &data.email, &data.phone).await? {
        return Ok(existing);
    }
    if let Some(created) = insert_if_absent(&mut *conn, data).await? {
        return Ok(created);
    }
    // Lost the race to a concurrent booking; its row is visible now.
    find_by_contact(&mut *conn, &data.email, &data.phone)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}
