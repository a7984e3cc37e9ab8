use async_graphql::{InputObject, OutputType, SimpleObject};

use crate::gql::domains::reservations::types::Reservation;
use infra::pagination::LimitOffset;

const MAX_PAGE_LIMIT: i32 = 100;

#[derive(InputObject, Clone, Copy, Debug, Default)]
pub struct PaginationInput {
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

impl PaginationInput {
    pub fn to_limit_offset(&self) -> LimitOffset {
        let limit = self.limit.unwrap_or(50).clamp(1, MAX_PAGE_LIMIT);
        let offset = self.offset.unwrap_or(0).max(0);
        LimitOffset {
            limit: limit as i64,
            offset: offset as i64,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
#[graphql(concrete(name = "ReservationPage", params(Reservation)))]
pub struct PaginatedResponse<T: OutputType> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page_size: i64,
    pub offset: i64,
    pub has_next_page: bool,
}

impl<T: OutputType> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total_count: i64, page: LimitOffset) -> Self {
        let page_size = items.len() as i64;
        let has_next_page = page.offset.saturating_add(page_size) < total_count;
        Self {
            items,
            total_count,
            page_size,
            offset: page.offset,
            has_next_page,
        }
    }
}
