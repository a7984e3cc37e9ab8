pub type Db = sqlx::PgPool;
