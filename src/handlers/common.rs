use crate::PaginatedResponse;
use axum::{http::StatusCode, response::IntoResponse, response::Response};
use serde::Deserialize;
use utoipa::IntoParams;

pub const MAX_LIMIT: u64 = 100;

/// Paging and free-text search shared by the list endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Page number (default: 1)
    pub page: Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub limit: Option<u64>,
    /// Case-insensitive search term
    pub search: Option<String>,
}

impl ListParams {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).clamp(1, MAX_LIMIT)
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }
}

/// Slices an already filtered list into one page
pub fn paginate<T>(items: Vec<T>, page: u64, limit: u64) -> PaginatedResponse<T> {
    let total = items.len() as u64;
    let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };
    let offset = page.saturating_sub(1).saturating_mul(limit);
    let items = items
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(limit as usize)
        .collect();

    PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    }
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_sliced_in_order() {
        let page = paginate((1..=45).collect::<Vec<_>>(), 3, 20);
        assert_eq!(page.items, (41..=45).collect::<Vec<_>>());
        assert_eq!(page.total, 45);
        assert_eq!(page.total_pages, 3);

        let beyond = paginate(vec![1, 2, 3], 9, 20);
        assert!(beyond.items.is_empty());
        assert_eq!(paginate(Vec::<u8>::new(), 1, 20).total_pages, 0);
    }

    #[test]
    fn limits_are_clamped() {
        let params = ListParams {
            page: Some(0),
            limit: Some(1000),
            search: None,
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 100);
        assert_eq!(ListParams::default().limit(), 20);
    }
}
