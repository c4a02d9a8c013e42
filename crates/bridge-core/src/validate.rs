//! Input validation and normalization for tool arguments.
//!
//! Nothing reaches the backend unless it passed through here.

use serde_json::Value;

use crate::config::SearchConfig;
use crate::error::{BridgeError, Result};
use crate::types::{FetchArgs, FetchRequest, SearchArgs, SearchRequest, StatsArgs, StatsRequest};

/// Validate `search` arguments.
pub fn validate_search(args: &SearchArgs, config: &SearchConfig) -> Result<SearchRequest> {
    let query = required(args.query.as_deref(), "query")?;

    Ok(SearchRequest {
        collection: normalize_collection(args.collection.as_deref(), config),
        query,
        limit: normalize_limit(args.limit.as_ref(), config),
    })
}

/// Validate `fetch` arguments.
pub fn validate_fetch(args: &FetchArgs, config: &SearchConfig) -> Result<FetchRequest> {
    let document_id = required(args.document_id.as_deref(), "document_id")?;

    Ok(FetchRequest {
        collection: normalize_collection(args.collection.as_deref(), config),
        document_id,
    })
}

/// Normalize `stats` arguments. Cannot fail.
pub fn validate_stats(args: &StatsArgs, config: &SearchConfig) -> StatsRequest {
    StatsRequest {
        collection: normalize_collection(args.collection.as_deref(), config),
    }
}

/// Trimmed collection name, or the configured default when absent or blank.
pub fn normalize_collection(raw: Option<&str>, config: &SearchConfig) -> String {
    match raw.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => config.default_collection.clone(),
    }
}

/// Parse a caller-supplied limit and clamp it into `[1, max_limit]`.
///
/// Unparseable values fall back to `default_limit`; out-of-range values are
/// clamped, never rejected.
pub fn normalize_limit(raw: Option<&Value>, config: &SearchConfig) -> u32 {
    let max = i64::from(config.max_limit.max(1));
    let requested = raw
        .and_then(parse_limit)
        .unwrap_or_else(|| i64::from(config.default_limit));

    // Clamped into 1..=u32::MAX, so the cast is lossless.
    requested.clamp(1, max) as u32
}

fn parse_limit(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().and_then(truncate_float)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate_float))
        }
        _ => None,
    }
}

fn truncate_float(f: f64) -> Option<i64> {
    // `as` saturates on overflow.
    f.is_finite().then(|| f.trunc() as i64)
}

fn required(raw: Option<&str>, field: &str) -> Result<String> {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(BridgeError::invalid_argument(format!(
            "{} must be a non-empty string",
            field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> SearchConfig {
        SearchConfig {
            default_collection: "notes".to_string(),
            default_limit: 5,
            max_limit: 50,
        }
    }

    #[test]
    fn test_blank_query_is_rejected() {
        for query in [None, Some(""), Some("   "), Some("\t\n "), Some("\u{3000}")] {
            let args = SearchArgs {
                query: query.map(String::from),
                ..Default::default()
            };
            let err = validate_search(&args, &config()).unwrap_err();
            assert!(
                matches!(err, BridgeError::InvalidArgument { .. }),
                "query {:?} should be rejected",
                query
            );
        }
    }

    #[test]
    fn test_search_defaults() {
        let args = SearchArgs {
            query: Some("  vector stores ".to_string()),
            ..Default::default()
        };
        let req = validate_search(&args, &config()).unwrap();
        assert_eq!(req.query, "vector stores");
        assert_eq!(req.collection, "notes");
        assert_eq!(req.limit, 5);
    }

    #[test]
    fn test_collection_defaults_when_blank() {
        assert_eq!(normalize_collection(None, &config()), "notes");
        assert_eq!(normalize_collection(Some(""), &config()), "notes");
        assert_eq!(normalize_collection(Some("  "), &config()), "notes");
        assert_eq!(normalize_collection(Some(" papers "), &config()), "papers");
    }

    #[test]
    fn test_limit_is_clamped() {
        let cfg = config();
        assert_eq!(normalize_limit(Some(&json!(10)), &cfg), 10);
        assert_eq!(normalize_limit(Some(&json!(1)), &cfg), 1);
        assert_eq!(normalize_limit(Some(&json!(50)), &cfg), 50);
        assert_eq!(normalize_limit(Some(&json!(51)), &cfg), 50);
        assert_eq!(normalize_limit(Some(&json!(0)), &cfg), 1);
        assert_eq!(normalize_limit(Some(&json!(-3)), &cfg), 1);
        assert_eq!(normalize_limit(Some(&json!(i64::MIN)), &cfg), 1);
        assert_eq!(normalize_limit(Some(&json!(u64::MAX)), &cfg), 50);
    }

    #[test]
    fn test_limit_range_holds_for_all_integers() {
        let cfg = config();
        for raw in (-200i64..200).chain([i64::MAX, i64::MIN, i64::from(u32::MAX) + 1]) {
            let limit = normalize_limit(Some(&json!(raw)), &cfg);
            assert!((1..=cfg.max_limit).contains(&limit), "{raw} -> {limit}");
        }
    }

    #[test]
    fn test_limit_parses_strings_and_floats() {
        let cfg = config();
        assert_eq!(normalize_limit(Some(&json!("12")), &cfg), 12);
        assert_eq!(normalize_limit(Some(&json!(" 8 ")), &cfg), 8);
        assert_eq!(normalize_limit(Some(&json!("999")), &cfg), 50);
        assert_eq!(normalize_limit(Some(&json!("-4")), &cfg), 1);
        assert_eq!(normalize_limit(Some(&json!(3.9)), &cfg), 3);
        assert_eq!(normalize_limit(Some(&json!("7.5")), &cfg), 7);
        assert_eq!(normalize_limit(Some(&json!(1e300)), &cfg), 50);
    }

    #[test]
    fn test_unparseable_limit_uses_default() {
        let cfg = config();
        for raw in [
            json!("ten"),
            json!(""),
            json!("NaN"),
            json!(null),
            json!(true),
            json!([3]),
            json!({"k": 3}),
        ] {
            assert_eq!(normalize_limit(Some(&raw), &cfg), 5, "{raw}");
        }
        assert_eq!(normalize_limit(None, &cfg), 5);
    }

    #[test]
    fn test_fetch_requires_document_id() {
        for id in [None, Some(""), Some("  ")] {
            let args = FetchArgs {
                collection: None,
                document_id: id.map(String::from),
            };
            assert!(matches!(
                validate_fetch(&args, &config()),
                Err(BridgeError::InvalidArgument { .. })
            ));
        }

        let args = FetchArgs {
            collection: Some("papers".to_string()),
            document_id: Some(" 42 ".to_string()),
        };
        let req = validate_fetch(&args, &config()).unwrap();
        assert_eq!(req.document_id, "42");
        assert_eq!(req.collection, "papers");
    }

    #[test]
    fn test_stats_defaults_collection() {
        let req = validate_stats(&StatsArgs::default(), &config());
        assert_eq!(req.collection, "notes");
    }
}
