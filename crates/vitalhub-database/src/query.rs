//! Filtered list query building.
//!
//! Admin listings run two queries over the same criteria: a scalar
//! `COUNT(*)` and a `LIMIT/OFFSET` page fetch. [`ListQueryBuilder`]
//! collects `(predicate, bind value)` pairs in one ordered list and
//! renders placeholders from the list position, so the count and the
//! page query can never disagree about which rows match and placeholder
//! numbering cannot drift as optional filters come and go.
//!
//! Filter values only ever travel as bound parameters. Column names are
//! supplied by repository code, never by the caller of the HTTP API.

use chrono::{DateTime, Utc};
use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};

/// A value bound to one predicate placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// A text value.
    Text(String),
    /// A boolean value.
    Bool(bool),
    /// A UTC timestamp.
    Timestamp(DateTime<Utc>),
}

/// Accumulates filter predicates for one listing query pair.
#[derive(Debug, Clone, Default)]
pub struct ListQueryBuilder {
    predicates: Vec<String>,
    values: Vec<BindValue>,
}

impl ListQueryBuilder {
    /// Create an empty builder (matches all rows).
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, predicate: String, value: BindValue) -> &mut Self {
        self.predicates.push(predicate);
        self.values.push(value);
        self
    }

    /// Next placeholder index, derived from the values already collected.
    fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// Case-insensitive partial match: `column ILIKE '%' || $n || '%'`.
    pub fn contains(&mut self, column: &str, needle: &str) -> &mut Self {
        let n = self.next_placeholder();
        self.push(
            format!("{column} ILIKE '%' || ${n} || '%'"),
            BindValue::Text(needle.to_owned()),
        )
    }

    /// Exact text equality.
    pub fn equals(&mut self, column: &str, value: &str) -> &mut Self {
        let n = self.next_placeholder();
        self.push(
            format!("{column} = ${n}"),
            BindValue::Text(value.to_owned()),
        )
    }

    /// Boolean equality.
    pub fn equals_bool(&mut self, column: &str, value: bool) -> &mut Self {
        let n = self.next_placeholder();
        self.push(format!("{column} = ${n}"), BindValue::Bool(value))
    }

    /// Inclusive lower bound on a timestamp column.
    pub fn not_before(&mut self, column: &str, bound: DateTime<Utc>) -> &mut Self {
        let n = self.next_placeholder();
        self.push(format!("{column} >= ${n}"), BindValue::Timestamp(bound))
    }

    /// Inclusive upper bound on a timestamp column.
    pub fn not_after(&mut self, column: &str, bound: DateTime<Utc>) -> &mut Self {
        let n = self.next_placeholder();
        self.push(format!("{column} <= ${n}"), BindValue::Timestamp(bound))
    }

    /// Number of collected predicates.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no filters were requested.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn where_clause(&self) -> String {
        if self.predicates.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.predicates.join(" AND "))
        }
    }

    /// Render the unpaginated `COUNT(*)` query.
    pub fn count_sql(&self, table: &str) -> String {
        format!("SELECT COUNT(*) FROM {table}{}", self.where_clause())
    }

    /// Render the page-fetch query over the identical predicate list,
    /// newest first. The limit and offset placeholders follow the filter
    /// placeholders and must be bound after them.
    pub fn page_sql(&self, table: &str, columns: &str, order_column: &str) -> String {
        let limit = self.next_placeholder();
        let offset = limit + 1;
        format!(
            "SELECT {columns} FROM {table}{} ORDER BY {order_column} DESC LIMIT ${limit} OFFSET ${offset}",
            self.where_clause()
        )
    }

    /// Bind the collected values, in order, onto the count query.
    pub fn bind_count<'q>(
        &'q self,
        query: QueryScalar<'q, Postgres, i64, PgArguments>,
    ) -> QueryScalar<'q, Postgres, i64, PgArguments> {
        self.values.iter().fold(query, |q, value| match value {
            BindValue::Text(s) => q.bind(s),
            BindValue::Bool(b) => q.bind(b),
            BindValue::Timestamp(t) => q.bind(t),
        })
    }

    /// Bind the collected values, in order, onto the page query. The
    /// caller appends the limit and offset binds afterwards.
    pub fn bind_rows<'q, T>(
        &'q self,
        query: QueryAs<'q, Postgres, T, PgArguments>,
    ) -> QueryAs<'q, Postgres, T, PgArguments> {
        self.values.iter().fold(query, |q, value| match value {
            BindValue::Text(s) => q.bind(s),
            BindValue::Bool(b) => q.bind(b),
            BindValue::Timestamp(t) => q.bind(t),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn no_filters_renders_bare_queries() {
        let builder = ListQueryBuilder::new();
        assert_eq!(
            builder.count_sql("audit_events"),
            "SELECT COUNT(*) FROM audit_events"
        );
        assert_eq!(
            builder.page_sql("audit_events", "*", "created_at"),
            "SELECT * FROM audit_events ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        assert!(builder.is_empty());
    }

    #[test]
    fn single_filter_numbers_from_one() {
        let mut builder = ListQueryBuilder::new();
        builder.contains("actor", "a@x.com");
        assert_eq!(
            builder.count_sql("audit_events"),
            "SELECT COUNT(*) FROM audit_events WHERE actor ILIKE '%' || $1 || '%'"
        );
        assert_eq!(
            builder.page_sql("audit_events", "*", "created_at"),
            "SELECT * FROM audit_events WHERE actor ILIKE '%' || $1 || '%' \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
    }

    #[test]
    fn all_filters_number_contiguously() {
        let mut builder = ListQueryBuilder::new();
        builder
            .contains("actor", "a@x.com")
            .equals("action", "user.create")
            .not_before("created_at", ts("2024-01-01T00:00:00Z"))
            .not_after("created_at", ts("2024-12-31T23:59:59Z"));

        assert_eq!(builder.len(), 4);
        assert_eq!(
            builder.count_sql("audit_events"),
            "SELECT COUNT(*) FROM audit_events \
             WHERE actor ILIKE '%' || $1 || '%' AND action = $2 \
             AND created_at >= $3 AND created_at <= $4"
        );
        assert_eq!(
            builder.page_sql("audit_events", "id, actor", "created_at"),
            "SELECT id, actor FROM audit_events \
             WHERE actor ILIKE '%' || $1 || '%' AND action = $2 \
             AND created_at >= $3 AND created_at <= $4 \
             ORDER BY created_at DESC LIMIT $5 OFFSET $6"
        );
    }

    #[test]
    fn every_filter_subset_keeps_count_and_page_predicates_identical() {
        // Exercise all 16 subsets of the four audit filters; the WHERE
        // clause must be byte-identical between the two artifacts and
        // placeholders must be gapless.
        for mask in 0..16u8 {
            let mut builder = ListQueryBuilder::new();
            if mask & 1 != 0 {
                builder.contains("actor", "a@x.com");
            }
            if mask & 2 != 0 {
                builder.equals("action", "user.create");
            }
            if mask & 4 != 0 {
                builder.not_before("created_at", ts("2024-01-01T00:00:00Z"));
            }
            if mask & 8 != 0 {
                builder.not_after("created_at", ts("2024-12-31T23:59:59Z"));
            }

            let count = builder.count_sql("audit_events");
            let page = builder.page_sql("audit_events", "*", "created_at");

            let count_where = count.split_once(" WHERE ").map(|(_, w)| w.to_owned());
            let page_where = page
                .split_once(" WHERE ")
                .map(|(_, w)| w.split(" ORDER BY ").next().unwrap().to_owned());
            assert_eq!(count_where, page_where, "subset mask {mask}");

            // Placeholders $1..=$n+2 all present, none skipped.
            let n = builder.len();
            for i in 1..=n + 2 {
                assert!(page.contains(&format!("${i}")), "missing ${i} in {page}");
            }
            assert!(!page.contains(&format!("${}", n + 3)));
        }
    }

    #[test]
    fn mixed_value_kinds_are_kept_in_push_order() {
        let mut builder = ListQueryBuilder::new();
        builder
            .equals_bool("is_active", true)
            .contains("email", "clinic");
        assert_eq!(
            builder.count_sql("users"),
            "SELECT COUNT(*) FROM users WHERE is_active = $1 AND email ILIKE '%' || $2 || '%'"
        );
    }
}
