use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::{RestaurantListingRow, RestaurantRow};
use crate::pagination::LimitOffset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestaurantSort {
    #[default]
    Rating,
    Name,
    CreatedAt,
    Capacity,
}

impl RestaurantSort {
    fn column(&self) -> &'static str {
        match self {
            RestaurantSort::Rating => "avg_rating",
            RestaurantSort::Name => "r.name",
            RestaurantSort::CreatedAt => "r.created_at",
            RestaurantSort::Capacity => "r.capacity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Filters for the public restaurant listing. `None` means "don't filter".
#[derive(Debug, Clone, Default)]
pub struct RestaurantSearch {
    pub area: Option<String>,
    pub cuisine: Option<String>,
    pub budget: Option<String>,
    pub min_people: Option<i32>,
    /// Only restaurants with a non-closed opening row on this weekday (0 = Sunday).
    pub open_on_weekday: Option<i32>,
    pub sort: RestaurantSort,
    pub direction: SortDirection,
}

#[derive(Debug, Clone)]
pub struct CreateRestaurant {
    pub org_id: Uuid,
    pub slug: String,
    pub name: String,
    pub genre: String,
    pub budget: String,
    pub area: String,
    pub place: String,
    pub timezone: String,
    pub capacity: i32,
}

const RESTAURANT_COLUMNS: &str = r#"
    id, org_id, slug, name, slogan, place, genre, budget, title, description,
    area, address, phone, timezone, capacity, is_open, created_at, updated_at
"#;

const LISTING_FROM: &str = r#"
    FROM restaurants r
    LEFT JOIN (
        SELECT restaurant_id, AVG(rating)::float8 AS avg_rating, COUNT(*) AS review_count
        FROM reviews
        WHERE is_approved = true
        GROUP BY restaurant_id
    ) rv ON rv.restaurant_id = r.id
"#;

// Single prepared WHERE using the NULL-or-match pattern.
const SEARCH_WHERE: &str = r#"
    WHERE r.is_open = true
      AND ($1::text IS NULL OR r.area ILIKE '%' || $1 || '%' OR r.place ILIKE '%' || $1 || '%')
      AND ($2::text IS NULL OR r.genre ILIKE '%' || $2 || '%')
      AND ($3::text IS NULL OR r.budget = $3)
      AND ($4::int IS NULL OR r.capacity >= $4)
      AND ($5::int IS NULL OR EXISTS (
            SELECT 1 FROM opening_hours oh
            WHERE oh.restaurant_id = r.id AND oh.weekday = $5 AND oh.is_closed = false
          ))
"#;

fn listing_select() -> String {
    format!(
        r#"
        SELECT r.id, r.org_id, r.slug, r.name, r.slogan, r.place, r.genre, r.budget, r.title,
               r.description, r.area, r.address, r.phone, r.timezone, r.capacity, r.is_open,
               COALESCE(rv.avg_rating, 0)::float8 AS avg_rating,
               COALESCE(rv.review_count, 0)::bigint AS review_count,
               r.created_at, r.updated_at
        {LISTING_FROM}
        "#
    )
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateRestaurant,
) -> SqlxResult<RestaurantRow> {
    let sql = format!(
        r#"
        INSERT INTO restaurants (org_id, slug, name, genre, budget, area, place, timezone, capacity)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {RESTAURANT_COLUMNS}
        "#
    );
    sqlx::query_as::<_, RestaurantRow>(&sql)
        .bind(data.org_id)
        .bind(data.slug)
        .bind(data.name)
        .bind(data.genre)
        .bind(data.budget)
        .bind(data.area)
        .bind(data.place)
        .bind(data.timezone)
        .bind(data.capacity)
        .fetch_one(executor)
        .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<RestaurantRow>> {
    let sql = format!("SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = $1");
    sqlx::query_as::<_, RestaurantRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Same as [`get_by_id`] but holds a row lock until the surrounding
/// transaction ends. Used to serialize reservation admission.
pub async fn get_for_update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<RestaurantRow>> {
    let sql = format!("SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, RestaurantRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Restaurant detail with its approved-review aggregate.
pub async fn get_listing_by_slug<'e>(
    executor: impl PgExecutor<'e>,
    slug: &str,
) -> SqlxResult<Option<RestaurantListingRow>> {
    let sql = format!("{} WHERE r.slug = $1", listing_select());
    sqlx::query_as::<_, RestaurantListingRow>(&sql)
        .bind(slug)
        .fetch_optional(executor)
        .await
}

pub async fn get_by_ids<'e>(
    executor: impl PgExecutor<'e>,
    ids: &[Uuid],
) -> SqlxResult<Vec<RestaurantRow>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!("SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = ANY($1::uuid[])");
    sqlx::query_as::<_, RestaurantRow>(&sql)
        .bind(ids)
        .fetch_all(executor)
        .await
}

pub async fn search<'e>(
    executor: impl PgExecutor<'e>,
    filter: &RestaurantSearch,
    page: LimitOffset,
) -> SqlxResult<Vec<RestaurantListingRow>> {
    // Sort column and direction come from closed enums, never from input text.
    let sql = format!(
        "{select} {SEARCH_WHERE} ORDER BY {column} {direction}, r.id ASC LIMIT $6 OFFSET $7",
        select = listing_select(),
        column = filter.sort.column(),
        direction = filter.direction.keyword(),
    );

    sqlx::query_as::<_, RestaurantListingRow>(&sql)
        .bind(filter.area.as_deref())
        .bind(filter.cuisine.as_deref())
        .bind(filter.budget.as_deref())
        .bind(filter.min_people)
        .bind(filter.open_on_weekday)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(executor)
        .await
}

pub async fn count<'e>(executor: impl PgExecutor<'e>, filter: &RestaurantSearch) -> SqlxResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM restaurants r {SEARCH_WHERE}");

    sqlx::query_scalar::<_, i64>(&sql)
        .bind(filter.area.as_deref())
        .bind(filter.cuisine.as_deref())
        .bind(filter.budget.as_deref())
        .bind(filter.min_people)
        .bind(filter.open_on_weekday)
        .fetch_one(executor)
        .await
}
