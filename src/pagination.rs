//! Paged, sorted and filtered listings.
//!
//! List endpoints take the query parameters the frontend table component
//! sends (`pageIndex`, `pageSize`, `sortColumn`, `sortOrder`, `filterColumn`,
//! `filterQuery`) and answer with a [`Page`]. Column names coming from the
//! client are only ever used to look up a whitelisted SQL column in a
//! [`Listing`], never interpolated directly.

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::FromSqliteRow;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRequest {
    pub page_index: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_column: Option<String>,
    pub sort_order: Option<String>,
    pub filter_column: Option<String>,
    pub filter_query: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some(s) if s.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A sortable / filterable property of a listing.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// Property name as the API exposes it.
    pub name: &'static str,
    /// Column name in the table.
    pub sql: &'static str,
}

/// Describes how one table can be listed.
#[derive(Debug, Clone, Copy)]
pub struct Listing {
    pub table: &'static str,
    pub columns: &'static [Column],
    pub default_sort: &'static str,
}

impl Listing {
    fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page_index: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub sort_column: Option<String>,
    pub sort_order: Option<String>,
    pub filter_column: Option<String>,
    pub filter_query: Option<String>,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            page_index: self.page_index,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            sort_column: self.sort_column,
            sort_order: self.sort_order,
            filter_column: self.filter_column,
            filter_query: self.filter_query,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        }
    }
}

/// A [`PageRequest`] checked against a [`Listing`].
#[derive(Debug, Clone)]
pub struct ValidatedPage {
    pub page_index: i64,
    pub page_size: i64,
    sort: Option<(Column, SortOrder)>,
    filter: Option<(Column, String)>,
}

impl PageRequest {
    pub fn validate(&self, listing: &Listing) -> Result<ValidatedPage> {
        let page_index = self.page_index.unwrap_or(0);
        if page_index < 0 {
            return Err(AppError::Validation(
                "pageIndex must not be negative".to_string(),
            ));
        }

        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::Validation(format!(
                "pageSize must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let sort = match non_empty(&self.sort_column) {
            Some(name) => {
                let column = listing.column(name).ok_or_else(|| {
                    AppError::Validation(format!("Cannot sort by '{}'", name))
                })?;
                Some((*column, SortOrder::parse(self.sort_order.as_deref())))
            }
            None => None,
        };

        let filter = match (non_empty(&self.filter_column), non_empty(&self.filter_query)) {
            (Some(name), Some(query)) => {
                let column = listing.column(name).ok_or_else(|| {
                    AppError::Validation(format!("Cannot filter by '{}'", name))
                })?;
                Some((*column, query.to_string()))
            }
            _ => None,
        };

        Ok(ValidatedPage {
            page_index,
            page_size,
            sort,
            filter,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Escape LIKE wildcards so user input only ever matches literally.
fn like_prefix(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 1);
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Fetch one page of `listing`, restricted to rows where `scope` matches.
pub fn fetch_page<T: FromSqliteRow>(
    conn: &rusqlite::Connection,
    listing: &Listing,
    scope: Option<(&str, &str)>,
    page: &ValidatedPage,
) -> rusqlite::Result<Page<T>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some((column, value)) = scope {
        clauses.push(format!("{} = ?", column));
        params.push(Value::Text(value.to_string()));
    }
    if let Some((column, query)) = &page.filter {
        clauses.push(format!("{} LIKE ? ESCAPE '\\'", column.sql));
        params.push(Value::Text(like_prefix(query)));
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    let total_count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}{}", listing.table, where_sql),
        rusqlite::params_from_iter(params.iter()),
        |row| row.get(0),
    )?;

    let order_sql = match &page.sort {
        Some((column, order)) => format!("{} {}, id", column.sql, order.as_str()),
        None => format!("{}, id", listing.default_sort),
    };

    // An offset past i64 is past the end of any table.
    let data = match page.page_index.checked_mul(page.page_size) {
        Some(offset) => {
            let mut page_params = params;
            page_params.push(Value::Integer(page.page_size));
            page_params.push(Value::Integer(offset));

            let mut stmt = conn.prepare(&format!(
                "SELECT * FROM {}{} ORDER BY {} LIMIT ? OFFSET ?",
                listing.table, where_sql, order_sql
            ))?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(page_params.iter()), T::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        }
        None => Vec::new(),
    };

    let total_pages = (total_count + page.page_size - 1) / page.page_size;

    Ok(Page {
        data,
        page_index: page.page_index,
        page_size: page.page_size,
        total_count,
        total_pages,
        sort_column: page.sort.map(|(c, _)| c.name.to_string()),
        sort_order: page
            .sort
            .map(|(_, o)| o.as_str().to_ascii_lowercase()),
        filter_column: page.filter.as_ref().map(|(c, _)| c.name.to_string()),
        filter_query: page.filter.as_ref().map(|(_, q)| q.clone()),
        has_previous_page: page.page_index > 0,
        has_next_page: page.page_index.saturating_add(1) < total_pages,
    })
}
