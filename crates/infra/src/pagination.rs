#[derive(Debug, Clone, Copy)]
pub struct LimitOffset {
    pub limit: i64,
    pub offset: i64,
}

impl Default for LimitOffset {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

impl LimitOffset {
    /// Page numbers start at 1; anything lower is treated as the first page.
    pub fn from_page(page: i64, per_page: i64) -> Self {
        let page = page.max(1);
        Self {
            limit: per_page,
            offset: (page - 1) * per_page,
        }
    }
}
