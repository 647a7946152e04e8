//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl PaginationParams {
    /// Clamps `per_page` to the allowed maximum of 100.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
        }
    }

    /// Slices a full result set down to the requested page and builds
    /// the matching metadata.
    #[must_use]
    pub fn paginate<T>(&self, items: Vec<T>) -> (Vec<T>, PaginationMeta) {
        let params = self.clamped();
        #[allow(clippy::cast_possible_truncation)]
        let total = items.len() as u32;
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(params.per_page)
        };
        // usize arithmetic: u32 offsets can overflow on huge page numbers.
        let start = (params.page as usize)
            .saturating_sub(1)
            .saturating_mul(params.per_page as usize);
        let data = items
            .into_iter()
            .skip(start)
            .take(params.per_page as usize)
            .collect();
        (
            data,
            PaginationMeta {
                page: params.page,
                per_page: params.per_page,
                total,
                total_pages,
            },
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn paginate_slices_and_counts() {
        let params = PaginationParams {
            page: 2,
            per_page: 3,
        };
        let (data, meta) = params.paginate((0..8).collect::<Vec<_>>());
        assert_eq!(data, vec![3, 4, 5]);
        assert_eq!(meta.total, 8);
        assert_eq!(meta.total_pages, 3);
    }

    #[test]
    fn paginate_clamps_out_of_range_values() {
        let params = PaginationParams {
            page: 0,
            per_page: 500,
        };
        let (data, meta) = params.paginate(vec![1, 2, 3]);
        assert_eq!(data.len(), 3);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.per_page, 100);
        assert_eq!(meta.total_pages, 1);
    }

    #[test]
    fn huge_page_numbers_yield_an_empty_page() {
        let params = PaginationParams {
            page: u32::MAX,
            per_page: 100,
        };
        let (data, meta) = params.paginate((0..8).collect::<Vec<_>>());
        assert!(data.is_empty());
        assert_eq!(meta.page, u32::MAX);
        assert_eq!(meta.total, 8);
    }

    #[test]
    fn empty_set_has_zero_pages() {
        let params = PaginationParams {
            page: 1,
            per_page: 20,
        };
        let (data, meta) = params.paginate(Vec::<u32>::new());
        assert!(data.is_empty());
        assert_eq!(meta.total_pages, 0);
    }
}
