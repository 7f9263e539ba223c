//! API handlers module

pub mod authors;
pub mod citations;
pub mod docs;
pub mod download;
pub mod fulldata;
pub mod geodata;
pub mod ping;
pub mod results;
pub mod samples;
pub mod sites;
pub mod statistics;

use std::collections::HashMap;

use georoc_common::errors::{AppError, Result};
use georoc_common::QueryBuilder;

/// Raw query-string parameters
pub(crate) type Params = HashMap<String, String>;

/// Parse an optional integer parameter
///
/// A present but unparseable value is a client error, not a silent
/// default.
pub(crate) fn parse_i64(params: &Params, name: &str) -> Result<Option<i64>> {
    match params.get(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::UnparseableParameter {
                name: name.to_string(),
                value: raw.clone(),
            }),
    }
}

/// Apply the standard `limit` / `offset` pagination parameters
pub(crate) fn apply_pagination(builder: &mut QueryBuilder, params: &Params) -> Result<()> {
    if let Some(limit) = parse_i64(params, "limit")? {
        builder.add_limit(limit);
    }
    if let Some(offset) = parse_i64(params, "offset")? {
        builder.add_offset(offset);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_i64_absent_is_none() {
        assert_eq!(parse_i64(&params(&[]), "limit").unwrap(), None);
    }

    #[test]
    fn test_parse_i64_present() {
        let p = params(&[("limit", "50"), ("offset", " 10 ")]);
        assert_eq!(parse_i64(&p, "limit").unwrap(), Some(50));
        assert_eq!(parse_i64(&p, "offset").unwrap(), Some(10));
    }

    #[test]
    fn test_parse_i64_garbage_is_unparseable() {
        let p = params(&[("limit", "ten")]);
        let err = parse_i64(&p, "limit").unwrap_err();
        assert!(matches!(err, AppError::UnparseableParameter { .. }));
    }

    #[test]
    fn test_pagination_lands_in_rendered_sql() {
        let mut builder = QueryBuilder::new("SELECT personid FROM odm2.people");
        let p = params(&[("limit", "100"), ("offset", "200")]);
        apply_pagination(&mut builder, &p).unwrap();
        assert_eq!(
            builder.render(),
            "SELECT personid FROM odm2.people LIMIT 100 OFFSET 200"
        );
    }

    #[test]
    fn test_pagination_rejects_bad_offset() {
        let mut builder = QueryBuilder::new("SELECT personid FROM odm2.people");
        let p = params(&[("offset", "x")]);
        assert!(apply_pagination(&mut builder, &p).is_err());
    }
}
