//! Page-based pagination shared by every list endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_TAKE: i64 = 10;
pub const MAX_TAKE: i64 = 100;
pub const MAX_PAGE: i64 = 1_000_000;

/// Sort direction on `created_at`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Asc,
    #[default]
    #[serde(rename = "DESC")]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// `?page&take&order` query parameters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationRequest {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 1_000_000, message = "page must be between 1 and 1000000"))]
    pub page: i64,
    #[serde(default = "default_take")]
    #[validate(range(min = 1, max = 100, message = "take must be between 1 and 100"))]
    pub take: i64,
    #[serde(default)]
    pub order: SortOrder,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_take() -> i64 {
    DEFAULT_TAKE
}

impl Default for PaginationRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            take: DEFAULT_TAKE,
            order: SortOrder::Desc,
        }
    }
}

impl PaginationRequest {
    pub fn skip(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.take).max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    pub page: i64,
    pub take: i64,
    pub total_count: i64,
    pub total_page: i64,
    pub has_next_page: bool,
}

impl PageMeta {
    pub fn new(request: &PaginationRequest, total_count: i64) -> Self {
        let total_page = if total_count == 0 {
            0
        } else {
            (total_count + request.take - 1) / request.take
        };

        Self {
            page: request.page,
            take: request.take,
            total_count,
            total_page,
            has_next_page: request.page < total_page,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationResponse<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PaginationResponse<T> {
    pub fn new(data: Vec<T>, request: &PaginationRequest, total_count: i64) -> Self {
        Self {
            data,
            meta: PageMeta::new(request, total_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: i64, take: i64) -> PaginationRequest {
        PaginationRequest {
            page,
            take,
            order: SortOrder::Desc,
        }
    }

    #[test]
    fn test_skip() {
        assert_eq!(page(1, 10).skip(), 0);
        assert_eq!(page(3, 20).skip(), 40);
    }

    #[test]
    fn test_meta_rounds_total_pages_up() {
        let meta = PageMeta::new(&page(1, 10), 21);
        assert_eq!(meta.total_page, 3);
        assert!(meta.has_next_page);

        let last = PageMeta::new(&page(3, 10), 21);
        assert!(!last.has_next_page);
    }

    #[test]
    fn test_meta_empty_result() {
        let meta = PageMeta::new(&page(1, 10), 0);
        assert_eq!(meta.total_page, 0);
        assert!(!meta.has_next_page);
    }

    #[test]
    fn test_query_defaults() {
        let req: PaginationRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(req.take, 10);
        assert_eq!(req.order, SortOrder::Desc);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_values_fail_validation() {
        assert!(page(0, 10).validate().is_err());
        assert!(page(1, 0).validate().is_err());
        assert!(page(1, MAX_TAKE + 1).validate().is_err());
        assert!(page(1, MAX_TAKE).validate().is_ok());
        assert!(page(MAX_PAGE, MAX_TAKE).validate().is_ok());
        assert!(page(MAX_PAGE + 1, 10).validate().is_err());
    }

    #[test]
    fn test_huge_page_is_rejected_and_skip_never_overflows() {
        let req: PaginationRequest =
            serde_json::from_str(&format!(r#"{{"page":{},"take":100}}"#, i64::MAX)).unwrap();
        assert!(req.validate().is_err());
        assert_eq!(req.skip(), i64::MAX);
        assert_eq!(page(MAX_PAGE, MAX_TAKE).skip(), (MAX_PAGE - 1) * MAX_TAKE);
    }

    #[test]
    fn test_order_parses_uppercase() {
        let req: PaginationRequest = serde_json::from_str(r#"{"order":"ASC"}"#).unwrap();
        assert_eq!(req.order.as_sql(), "ASC");
    }
}
