//! Mapping of backend payloads into tool results.
//!
//! The backend has shipped several response layouts over time. Each endpoint
//! gets a small shape decoder that tries the known layouts in order and says
//! explicitly what it found.

use serde_json::{Map, Value};
use tracing::debug;

use crate::base_url::BaseUrl;
use crate::error::{BridgeError, Result};
use crate::types::{
    CollectionList, CollectionStats, FetchRequest, FetchedDocument, SearchHit, SearchResults,
};

/// Layouts of a `/doc` payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DocumentShape<'a> {
    /// `{item: {...}}`
    Wrapped(&'a Map<String, Value>),
    /// `{doc: {...}}`
    Legacy(&'a Map<String, Value>),
    /// The document fields at the top level.
    Flat(&'a Map<String, Value>),
}

/// Keys that make an object a document.
const DOCUMENT_FIELDS: [&str; 4] = ["id", "title", "text", "url"];

impl<'a> DocumentShape<'a> {
    /// Detect the layout of a payload. Returns `None` for non-objects and
    /// for objects that carry no document fields, such as a bare `{ok: true}`.
    pub fn detect(payload: &'a Value) -> Option<Self> {
        let fields = payload.as_object()?;
        let shape = match (fields.get("item"), fields.get("doc")) {
            (Some(Value::Object(item)), _) => Self::Wrapped(item),
            (_, Some(Value::Object(doc))) => Self::Legacy(doc),
            _ => Self::Flat(fields),
        };
        shape.is_document().then_some(shape)
    }

    fn is_document(&self) -> bool {
        let fields = self.fields();
        DOCUMENT_FIELDS.iter().any(|key| fields.contains_key(*key))
    }

    pub fn fields(&self) -> &'a Map<String, Value> {
        match *self {
            Self::Wrapped(fields) | Self::Legacy(fields) | Self::Flat(fields) => fields,
        }
    }
}

/// Layouts of a `/collections` payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollectionsShape<'a> {
    /// `{collections: [...]}`
    Named(&'a [Value]),
    /// `[...]`
    Bare(&'a [Value]),
    Unrecognized,
}

impl<'a> CollectionsShape<'a> {
    pub fn detect(payload: &'a Value) -> Self {
        match payload {
            Value::Array(names) => Self::Bare(names),
            Value::Object(fields) => match fields.get("collections") {
                Some(Value::Array(names)) => Self::Named(names),
                _ => Self::Unrecognized,
            },
            _ => Self::Unrecognized,
        }
    }

    /// Collection names in backend order, without duplicates. Entries that
    /// are not strings are skipped.
    pub fn names(&self) -> Vec<String> {
        let entries: &[Value] = match *self {
            Self::Named(entries) | Self::Bare(entries) => entries,
            Self::Unrecognized => &[],
        };

        let mut names: Vec<String> = Vec::with_capacity(entries.len());
        for name in entries.iter().filter_map(Value::as_str) {
            if !names.iter().any(|seen| seen == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

/// Map a `/query` payload into search hits.
pub fn map_search_results(payload: &Value, collection: &str, base: &BaseUrl) -> SearchResults {
    let Some(items) = payload.as_array() else {
        debug!("search payload is not a list, returning no results");
        return SearchResults {
            results: Vec::new(),
        };
    };

    let results = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let id = item
                .get("id")
                .and_then(id_string)
                .unwrap_or_else(|| index.to_string());
            let title = item
                .get("metadata")
                .and_then(|m| m.get("title"))
                .and_then(non_blank)
                .unwrap_or_else(|| format!("Document {}", id));
            let url = base.document_url(collection, &id);
            SearchHit { id, title, url }
        })
        .collect();

    SearchResults { results }
}

/// Map a `/doc` payload into a document.
pub fn map_document(
    payload: &Value,
    request: &FetchRequest,
    base: &BaseUrl,
) -> Result<FetchedDocument> {
    let shape = DocumentShape::detect(payload)
        .ok_or_else(|| BridgeError::backend_logical("unexpected document shape"))?;
    let doc = shape.fields();

    let id = doc
        .get("id")
        .and_then(id_string)
        .unwrap_or_else(|| request.document_id.clone());
    let title = doc
        .get("title")
        .and_then(non_blank)
        .unwrap_or_else(|| format!("doc:{}", request.document_id));
    let text = doc
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let url = doc
        .get("url")
        .and_then(non_blank)
        .unwrap_or_else(|| base.document_url(&request.collection, &request.document_id));
    let metadata = match doc.get("metadata") {
        Some(Value::Object(metadata)) => metadata.clone(),
        _ => Map::new(),
    };

    Ok(FetchedDocument {
        id,
        title,
        text,
        url,
        metadata,
    })
}

/// Map a `/collections` payload into collection names.
pub fn map_collections(payload: &Value) -> CollectionList {
    let shape = CollectionsShape::detect(payload);
    if shape == CollectionsShape::Unrecognized {
        debug!("unrecognized collections payload, returning no collections");
    }
    CollectionList {
        collections: shape.names(),
    }
}

/// Map a `/stats` payload.
pub fn map_stats(payload: Value, collection: &str) -> CollectionStats {
    let stats = match payload {
        Value::Object(stats) => stats,
        _ => Map::new(),
    };
    CollectionStats {
        collection: collection.to_string(),
        stats,
    }
}

/// Render a JSON id as a string. Strings are used verbatim, numbers and
/// booleans in their JSON form; anything else counts as missing.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn non_blank(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> BaseUrl {
        BaseUrl::parse("http://localhost:7070", &["localhost".to_string()]).unwrap()
    }

    fn fetch_request(id: &str) -> FetchRequest {
        FetchRequest {
            collection: "notes".to_string(),
            document_id: id.to_string(),
        }
    }

    #[test]
    fn test_search_hit_without_title() {
        let results = map_search_results(&json!([{"id": 7}]), "notes", &base());
        let hit = &results.results[0];
        assert_eq!(hit.id, "7");
        assert_eq!(hit.title, "Document 7");
        assert!(hit.url.contains("id=7"));
        assert_eq!(hit.url, "http://localhost:7070/doc?collection=notes&id=7");
    }

    #[test]
    fn test_search_preserves_order_and_uses_index_fallback() {
        let payload = json!([
            {"id": "b", "metadata": {"title": "Second"}, "score": 0.9},
            {"metadata": {"title": "   "}},
            {"id": "a", "metadata": {"title": "First"}},
        ]);
        let results = map_search_results(&payload, "notes", &base()).results;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id, "b");
        assert_eq!(results[0].title, "Second");
        assert_eq!(results[1].id, "1");
        assert_eq!(results[1].title, "Document 1");
        assert!(results[1].url.ends_with("id=1"));
        assert_eq!(results[2].title, "First");
    }

    #[test]
    fn test_search_non_list_payload_is_empty() {
        let results = map_search_results(&json!({"items": []}), "notes", &base());
        assert!(results.results.is_empty());
    }

    #[test]
    fn test_document_shapes() {
        let doc = json!({"id": 3, "title": "T", "text": "body"});
        assert!(matches!(
            DocumentShape::detect(&json!({"item": doc.clone()})),
            Some(DocumentShape::Wrapped(_))
        ));
        assert!(matches!(
            DocumentShape::detect(&json!({"ok": true, "doc": doc.clone()})),
            Some(DocumentShape::Legacy(_))
        ));
        assert!(matches!(
            DocumentShape::detect(&doc),
            Some(DocumentShape::Flat(_))
        ));
        assert!(DocumentShape::detect(&json!("doc")).is_none());
    }

    #[test]
    fn test_document_shapes_need_document_fields() {
        for payload in [
            json!({"ok": true}),
            json!({}),
            json!({"item": {}}),
            json!({"doc": {"ok": true}}),
        ] {
            assert!(DocumentShape::detect(&payload).is_none(), "{payload}");
            let err = map_document(&payload, &fetch_request("1"), &base()).unwrap_err();
            assert_eq!(err, BridgeError::backend_logical("unexpected document shape"));
        }

        // Legacy top-level documents still count as flat.
        assert!(matches!(
            DocumentShape::detect(&json!({"ok": true, "id": 4, "text": "t"})),
            Some(DocumentShape::Flat(_))
        ));
    }

    #[test]
    fn test_document_shapes_map_identically() {
        let doc = json!({
            "id": "n1",
            "title": "Note",
            "text": "hello",
            "url": "http://localhost:7070/custom",
            "metadata": {"tags": ["a"]}
        });
        let expected = FetchedDocument {
            id: "n1".to_string(),
            title: "Note".to_string(),
            text: "hello".to_string(),
            url: "http://localhost:7070/custom".to_string(),
            metadata: json!({"tags": ["a"]}).as_object().unwrap().clone(),
        };

        for payload in [json!({"item": doc.clone()}), json!({"doc": doc.clone()}), doc] {
            let mapped = map_document(&payload, &fetch_request("n1"), &base()).unwrap();
            assert_eq!(mapped, expected);
        }
    }

    #[test]
    fn test_document_defaults() {
        let mapped = map_document(&json!({"item": {"id": 9}}), &fetch_request("9"), &base())
            .unwrap();
        assert_eq!(mapped.id, "9");
        assert_eq!(mapped.title, "doc:9");
        assert_eq!(mapped.text, "");
        assert_eq!(mapped.url, "http://localhost:7070/doc?collection=notes&id=9");
        assert!(mapped.metadata.is_empty());
    }

    #[test]
    fn test_document_id_falls_back_to_request() {
        let mapped =
            map_document(&json!({"doc": {"text": "x"}}), &fetch_request("abc"), &base()).unwrap();
        assert_eq!(mapped.id, "abc");
        assert_eq!(mapped.title, "doc:abc");
    }

    #[test]
    fn test_document_non_object_payload() {
        let err = map_document(&json!([1]), &fetch_request("1"), &base()).unwrap_err();
        assert_eq!(err, BridgeError::backend_logical("unexpected document shape"));
    }

    #[test]
    fn test_collections_shapes() {
        let expected = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            map_collections(&json!({"collections": ["a", "b"]})).collections,
            expected
        );
        assert_eq!(map_collections(&json!(["a", "b"])).collections, expected);
        assert_eq!(
            map_collections(&json!({"ok": true, "collections": ["a", "b"]})).collections,
            expected
        );
    }

    #[test]
    fn test_collections_unrecognized_is_empty() {
        for payload in [
            json!({"names": ["a"]}),
            json!({"collections": "a"}),
            json!("a"),
            json!(null),
            json!(42),
        ] {
            assert_eq!(CollectionsShape::detect(&payload), CollectionsShape::Unrecognized);
            assert!(map_collections(&payload).collections.is_empty(), "{payload}");
        }
    }

    #[test]
    fn test_collections_skip_non_strings_and_duplicates() {
        let names = map_collections(&json!(["a", 1, "b", null, "a"])).collections;
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_stats_passthrough() {
        let stats = map_stats(json!({"count": 12, "dim": 384}), "notes");
        assert_eq!(stats.collection, "notes");
        assert_eq!(stats.stats.get("count"), Some(&json!(12)));

        assert!(map_stats(json!([1]), "notes").stats.is_empty());
    }
}
