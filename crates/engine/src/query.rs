//! Paging, ordering and search helpers shared by every listing.

use api_types::{PageView, PaginationQuery};
use sea_orm::{
    Order,
    sea_query::{Expr, Func, IntoIden, SimpleExpr},
};

pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const MAX_PAGE_LIMIT: u64 = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// `"ASC"` sorts ascending, anything else (or nothing) descending.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("ASC") => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub(crate) fn order(self) -> Order {
        match self {
            Self::Asc => Order::Asc,
            Self::Desc => Order::Desc,
        }
    }
}

/// A normalized page request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
    pub sort: SortDirection,
    /// Requested camelCase order field, checked against a per-listing
    /// allow-list.
    pub order: Option<String>,
}

impl PageRequest {
    pub fn new(
        page: Option<u64>,
        limit: Option<u64>,
        sort: Option<&str>,
        order: Option<String>,
    ) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(DEFAULT_PAGE_LIMIT)
                .clamp(1, MAX_PAGE_LIMIT),
            sort: SortDirection::parse(sort),
            order,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Picks the column for the requested order field, `default` when the
    /// field is missing or not allowed.
    pub(crate) fn order_column<C: Copy>(&self, fields: &[(&str, C)], default: C) -> C {
        self.order
            .as_deref()
            .and_then(|order| fields.iter().find(|(name, _)| *name == order))
            .map_or(default, |(_, column)| *column)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None, None, None)
    }
}

impl From<&PaginationQuery> for PageRequest {
    fn from(value: &PaginationQuery) -> Self {
        Self::new(
            value.page,
            value.limit,
            value.sort.as_deref(),
            value.order.clone(),
        )
    }
}

/// One page of results plus the total number of matching rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub count: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    pub fn empty(request: &PageRequest) -> Self {
        Self {
            data: Vec::new(),
            count: 0,
            page: request.page,
            limit: request.limit,
        }
    }

    pub fn into_view<V>(self) -> PageView<V>
    where
        V: for<'a> From<&'a T>,
    {
        PageView {
            data: self.data.iter().map(V::from).collect(),
            count: self.count,
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Trims a search value; empty values mean "no filter".
pub(crate) fn search_term(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Case-insensitive substring match on `table.column`.
pub(crate) fn contains_ignore_case<T, C>(table: T, column: C, needle: &str) -> SimpleExpr
where
    T: IntoIden,
    C: IntoIden,
{
    Expr::expr(Func::lower(Expr::col((table, column))))
        .like(format!("%{}%", needle.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_defaults_and_clamps() {
        let request = PageRequest::new(None, None, None, None);
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(request.sort, SortDirection::Desc);

        let request = PageRequest::new(Some(0), Some(1_000), Some("ASC"), None);
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, MAX_PAGE_LIMIT);
        assert_eq!(request.sort, SortDirection::Asc);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let request = PageRequest::new(Some(3), Some(20), None, None);
        assert_eq!(request.offset(), 40);
    }

    #[test]
    fn sort_is_descending_unless_exactly_asc() {
        assert_eq!(SortDirection::parse(Some("asc")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("DESC")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(None), SortDirection::Desc);
    }

    #[test]
    fn order_column_falls_back_to_default() {
        let fields = [("name", 1), ("createdAt", 2)];
        let request = PageRequest::new(None, None, None, Some("name".to_string()));
        assert_eq!(request.order_column(&fields, 0), 1);
        let request = PageRequest::new(None, None, None, Some("password".to_string()));
        assert_eq!(request.order_column(&fields, 0), 0);
    }

    #[test]
    fn blank_search_terms_are_ignored() {
        assert_eq!(search_term(Some("  ")), None);
        assert_eq!(search_term(Some(" wheat ")), Some("wheat"));
        assert_eq!(search_term(None), None);
    }
}
