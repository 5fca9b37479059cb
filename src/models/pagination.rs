use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// Page of results plus the total match count, which is independent of
/// the page size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        Self {
            data,
            meta: PaginationMeta {
                total,
                page,
                per_page,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_reports_totals_independent_of_page_size() {
        let page = Paginated::new(vec![1, 2, 3], 42, 2, 3);
        assert_eq!(page.data.len(), 3);
        assert_eq!(page.meta.total, 42);
        assert_eq!(page.meta.page, 2);
        assert_eq!(page.meta.per_page, 3);
    }
}
