use std::env;

use api::gql::{build_schema, AppSchema};
use api::{AppConfig, AppState};
use async_graphql::{Request, Variables};
use infra::repos::{courses, organizations, restaurants, CreateCourse, CreateRestaurant};
use sqlx::postgres::PgPoolOptions;
use testcontainers_modules::postgres::Postgres;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::testcontainers::ContainerAsync;
use uuid::Uuid;

/// A migrated database plus the state and schema wired to it.
///
/// Uses `TEST_DATABASE_URL` when set; otherwise starts a throwaway Postgres
/// container that lives as long as this value.
pub struct TestApp {
    pub state: AppState,
    pub schema: AppSchema,
    _container: Option<ContainerAsync<Postgres>>,
}

pub async fn setup_test_app() -> TestApp {
    let (database_url, container) = match env::var("TEST_DATABASE_URL") {
        Ok(url) => (url, None),
        Err(_) => {
            let container = Postgres::default()
                .start()
                .await
                .expect("Failed to start Postgres container");
            let host = container.get_host().await.expect("container host");
            let port = container
                .get_host_port_ipv4(5432)
                .await
                .expect("container port");
            (
                format!("postgres://postgres:postgres@{host}:{port}/postgres"),
                Some(container),
            )
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let state = AppState::new(pool, AppConfig::with_database_url(database_url));
    let schema = build_schema(state.clone());

    TestApp {
        state,
        schema,
        _container: container,
    }
}

/// Helper function to execute GraphQL queries and mutations
pub async fn execute_graphql(
    schema: &AppSchema,
    query: &str,
    variables: Option<Variables>,
) -> async_graphql::Response {
    let mut request = Request::new(query);

    if let Some(vars) = variables {
        request = request.variables(vars);
    }

    schema.execute(request).await
}

/// Suffix that keeps rows from parallel tests on a shared database apart.
pub fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Create an organization and a restaurant owned by it; returns the restaurant ID.
#[allow(dead_code)]
pub async fn create_test_restaurant(
    app_state: &AppState,
    slug: &str,
    area: &str,
    capacity: i32,
    timezone: &str,
) -> Uuid {
    let org = organizations::create(&app_state.db, &format!("Org for {slug}"))
        .await
        .expect("Failed to create test organization");

    let restaurant = restaurants::create(
        &app_state.db,
        CreateRestaurant {
            org_id: org.id,
            slug: slug.to_string(),
            name: format!("Restaurant {slug}"),
            genre: "Newari".to_string(),
            budget: "$$".to_string(),
            area: area.to_string(),
            place: "Patan".to_string(),
            timezone: timezone.to_string(),
            capacity,
        },
    )
    .await
    .expect("Failed to create test restaurant");

    restaurant.id
}

#[allow(dead_code)]
pub async fn create_test_course(app_state: &AppState, restaurant_id: Uuid, title: &str) -> Uuid {
    courses::create(
        &app_state.db,
        &CreateCourse {
            restaurant_id,
            title: title.to_string(),
            description: String::new(),
            course_price: 4500,
            stay_time: 120,
        },
    )
    .await
    .expect("Failed to create test course")
    .id
}

/// Upsert one opening-hour row.
#[allow(dead_code)]
pub async fn set_opening_hour(
    app_state: &AppState,
    restaurant_id: Uuid,
    weekday: i32,
    open: &str,
    close: &str,
    is_closed: bool,
) {
    sqlx::query(
        r#"
        INSERT INTO opening_hours (restaurant_id, weekday, open_time, close_time, is_closed)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (restaurant_id, weekday) DO UPDATE SET
            open_time = EXCLUDED.open_time,
            close_time = EXCLUDED.close_time,
            is_closed = EXCLUDED.is_closed
        "#,
    )
    .bind(restaurant_id)
    .bind(weekday)
    .bind(open)
    .bind(close)
    .bind(is_closed)
    .execute(&app_state.db)
    .await
    .expect("Failed to set opening hour");
}

#[allow(dead_code)]
pub async fn count_reservations(app_state: &AppState, restaurant_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE restaurant_id = $1")
        .bind(restaurant_id)
        .fetch_one(&app_state.db)
        .await
        .expect("Failed to count reservations")
}

#[allow(dead_code)]
pub async fn count_customers_with_email(app_state: &AppState, email: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE email = $1")
        .bind(email)
        .fetch_one(&app_state.db)
        .await
        .expect("Failed to count customers")
}
