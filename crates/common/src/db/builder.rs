//! SQL composition over the named templates
//!
//! A [`QueryBuilder`] starts from a base read template and appends optional
//! predicates, a limit and an offset, while keeping a trailing `GROUP BY`
//! clause at the tail of the rendered statement. The tail is detached once
//! at construction instead of re-scanning the template on every render.
//!
//! Injection policy: values flow through `$N` binds. The only interpolated
//! pieces are column references, which must come from the template
//! allow-list, and the `IN (...)` literals, which are restricted to a
//! character class excluding quote, semicolon and backslash.

use super::SqlValue;
use crate::db::templates::is_allowed_filter_column;
use crate::errors::{AppError, Result};

/// Composes a final SQL string from a template plus filters and pagination
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    pre: String,
    tail: Option<String>,
    filters: Vec<String>,
    params: Vec<SqlValue>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl QueryBuilder {
    /// Create a builder from a base SQL template
    ///
    /// A trailing `GROUP BY` clause (located case-insensitively at its last
    /// occurrence) is detached here and re-attached after pagination at
    /// render time.
    pub fn new(template: &str) -> Self {
        let lowered = template.to_lowercase();
        match lowered.rfind("group by") {
            Some(idx) => Self {
                pre: template[..idx].trim_end().to_string(),
                tail: Some(template[idx..].trim_end().to_string()),
                filters: Vec::new(),
                params: Vec::new(),
                limit: None,
                offset: None,
            },
            None => Self {
                pre: template.trim_end().to_string(),
                tail: None,
                filters: Vec::new(),
                params: Vec::new(),
                limit: None,
                offset: None,
            },
        }
    }

    /// Append an equality predicate bound through a placeholder
    pub fn add_eq_filter(&mut self, column: &str, value: SqlValue) -> Result<&mut Self> {
        self.add_cmp_filter(column, "=", value)
    }

    /// Append a less-than predicate bound through a placeholder
    pub fn add_lt_filter(&mut self, column: &str, value: SqlValue) -> Result<&mut Self> {
        self.add_cmp_filter(column, "<", value)
    }

    /// Append a greater-than predicate bound through a placeholder
    pub fn add_gt_filter(&mut self, column: &str, value: SqlValue) -> Result<&mut Self> {
        self.add_cmp_filter(column, ">", value)
    }

    fn add_cmp_filter(
        &mut self,
        column: &str,
        operator: &str,
        value: SqlValue,
    ) -> Result<&mut Self> {
        check_column(column)?;
        self.params.push(value);
        self.filters
            .push(format!("{} {} ${}", column, operator, self.params.len()));
        Ok(self)
    }

    /// Append `column IN ('a','b',...)` from a comma-separated caller string
    ///
    /// Every item must pass the literal character class; anything that could
    /// terminate the quoted string is rejected up front.
    pub fn add_in_filter_quoted(&mut self, column: &str, csv_values: &str) -> Result<&mut Self> {
        check_column(column)?;

        let mut quoted = Vec::new();
        for item in csv_values.split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            if !is_safe_literal(item) {
                return Err(AppError::InvalidFilter {
                    message: format!("filter value {:?} contains forbidden characters", item),
                });
            }
            quoted.push(format!("'{}'", item));
        }

        if quoted.is_empty() {
            return Err(AppError::InvalidFilter {
                message: format!("empty filter list for column {}", column),
            });
        }

        self.filters
            .push(format!("{} IN ({})", column, quoted.join(",")));
        Ok(self)
    }

    /// Set the LIMIT clause; values <= 0 omit it
    pub fn add_limit(&mut self, limit: i64) -> &mut Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// Set the OFFSET clause; values <= 0 omit it
    pub fn add_offset(&mut self, offset: i64) -> &mut Self {
        self.offset = (offset > 0).then_some(offset);
        self
    }

    /// Bind values collected by the placeholder filters, in order
    pub fn bind_values(&self) -> &[SqlValue] {
        &self.params
    }

    /// Render the final statement: template body, WHERE, LIMIT, OFFSET,
    /// then the re-attached GROUP BY tail
    pub fn render(&self) -> String {
        let mut sql = self.pre.clone();

        if !self.filters.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.filters.join(" AND "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }
        if let Some(tail) = &self.tail {
            sql.push(' ');
            sql.push_str(tail);
        }
        sql
    }
}

fn check_column(column: &str) -> Result<()> {
    if is_allowed_filter_column(column) {
        Ok(())
    } else {
        Err(AppError::InvalidFilter {
            message: format!("unknown filter column {:?}", column),
        })
    }
}

/// Character class for interpolated IN-list literals: word characters,
/// spaces and a few punctuation marks. Excludes quote, semicolon and
/// backslash.
fn is_safe_literal(value: &str) -> bool {
    value.chars().all(|c| {
        c.is_ascii_alphanumeric()
            || matches!(c, ' ' | '-' | '_' | '.' | '(' | ')' | '/' | '+' | '&')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = "SELECT personid FROM odm2.people";
    const GROUPED: &str =
        "SELECT latitude, longitude FROM odm2.sites GROUP BY latitude, longitude";

    #[test]
    fn test_render_without_clauses() {
        let builder = QueryBuilder::new(PLAIN);
        assert_eq!(builder.render(), PLAIN);
    }

    #[test]
    fn test_eq_filter_uses_placeholder() {
        let mut builder = QueryBuilder::new(PLAIN);
        builder
            .add_eq_filter("s.setting", SqlValue::from("VOLCANIC"))
            .unwrap();
        assert_eq!(
            builder.render(),
            "SELECT personid FROM odm2.people WHERE s.setting = $1"
        );
        assert_eq!(builder.bind_values(), &[SqlValue::Text("VOLCANIC".into())]);
    }

    #[test]
    fn test_filters_and_join_with_pagination() {
        let mut builder = QueryBuilder::new(PLAIN);
        builder
            .add_gt_filter("s.latitude", SqlValue::Float(-10.0))
            .unwrap()
            .add_lt_filter("s.latitude", SqlValue::Float(10.0))
            .unwrap();
        builder.add_limit(10).add_offset(20);
        assert_eq!(
            builder.render(),
            "SELECT personid FROM odm2.people WHERE s.latitude > $1 AND s.latitude < $2 LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn test_group_by_tail_stays_at_the_end() {
        let mut builder = QueryBuilder::new(GROUPED);
        builder.add_limit(10).add_offset(0);
        assert_eq!(
            builder.render(),
            "SELECT latitude, longitude FROM odm2.sites LIMIT 10 GROUP BY latitude, longitude"
        );
    }

    #[test]
    fn test_group_by_detection_is_case_insensitive() {
        let builder = QueryBuilder::new("SELECT a FROM t Group By a");
        assert_eq!(builder.render(), "SELECT a FROM t Group By a");
        let mut builder = QueryBuilder::new("SELECT a FROM t Group By a");
        builder.add_limit(5);
        assert_eq!(builder.render(), "SELECT a FROM t LIMIT 5 Group By a");
    }

    #[test]
    fn test_last_group_by_occurrence_wins() {
        let sql = "SELECT a FROM (SELECT b FROM t GROUP BY b) x GROUP BY a";
        let mut builder = QueryBuilder::new(sql);
        builder.add_limit(1);
        assert_eq!(
            builder.render(),
            "SELECT a FROM (SELECT b FROM t GROUP BY b) x LIMIT 1 GROUP BY a"
        );
    }

    #[test]
    fn test_zero_limit_and_offset_are_omitted() {
        let mut builder = QueryBuilder::new(PLAIN);
        builder.add_limit(0).add_offset(0);
        assert_eq!(builder.render(), PLAIN);
        builder.add_limit(-5).add_offset(-1);
        assert_eq!(builder.render(), PLAIN);
    }

    #[test]
    fn test_in_filter_quotes_values() {
        let mut builder = QueryBuilder::new(PLAIN);
        builder
            .add_in_filter_quoted("tax_type.taxonomicclassifiername", "Basalt,Andesite")
            .unwrap();
        assert_eq!(
            builder.render(),
            "SELECT personid FROM odm2.people WHERE tax_type.taxonomicclassifiername IN ('Basalt','Andesite')"
        );
    }

    #[test]
    fn test_in_filter_rejects_injection() {
        let mut builder = QueryBuilder::new(PLAIN);
        for payload in ["Basalt'); DROP TABLE odm2.people; --", "a'b", "x;y", r"a\b"] {
            assert!(builder
                .add_in_filter_quoted("tax_type.taxonomicclassifiername", payload)
                .is_err());
        }
        assert_eq!(builder.render(), PLAIN);
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let mut builder = QueryBuilder::new(PLAIN);
        assert!(builder
            .add_eq_filter("pg_catalog.pg_tables", SqlValue::Int(1))
            .is_err());
        assert!(builder
            .add_in_filter_quoted("evil; --", "Basalt")
            .is_err());
    }

    #[test]
    fn test_in_filter_trims_and_skips_empty_items() {
        let mut builder = QueryBuilder::new(PLAIN);
        builder
            .add_in_filter_quoted("ann_mat.annotationtext", " WR , GL ,")
            .unwrap();
        assert!(builder
            .render()
            .ends_with("WHERE ann_mat.annotationtext IN ('WR','GL')"));
    }
}
