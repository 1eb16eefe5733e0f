use serde::Deserialize;
use serde_json::{Map, Value};

/// Raw engine response for a `_search` call.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSearchResponse {
	pub hits: RawHits,
	#[serde(default)]
	pub aggregations: Map<String, Value>,
	#[serde(default)]
	pub suggest: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHits {
	pub total: RawTotal,
	#[serde(default)]
	pub hits: Vec<RawHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTotal {
	pub value: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
	#[serde(rename = "_id")]
	pub id: String,
	#[serde(rename = "_index")]
	pub index: String,
	#[serde(rename = "_source", default)]
	pub source: Map<String, Value>,
}

/// One entry of a `_mget` response. `source` is absent when the id is not in
/// the index.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDocument {
	#[serde(rename = "_id")]
	pub id: String,
	#[serde(rename = "_index")]
	pub index: String,
	#[serde(default)]
	pub found: bool,
	#[serde(rename = "_source", default)]
	pub source: Option<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_hits_and_aggregations() {
		let raw: RawSearchResponse = serde_json::from_value(serde_json::json!({
			"hits": {
				"total": { "value": 2, "relation": "eq" },
				"hits": [
					{ "_id": "a", "_index": "experiences", "_source": { "k": "v" } },
					{ "_id": "b", "_index": "experiences" }
				]
			},
			"aggregations": { "Provider": { "buckets": [] } }
		}))
		.expect("response should decode");

		assert_eq!(raw.hits.total.value, 2);
		assert_eq!(raw.hits.hits.len(), 2);
		assert!(raw.hits.hits[1].source.is_empty());
		assert!(raw.aggregations.contains_key("Provider"));
	}

	#[test]
	fn decodes_missing_mget_document() {
		let raw: RawDocument = serde_json::from_value(serde_json::json!({
			"_id": "gone",
			"_index": "experiences",
			"found": false
		}))
		.expect("document should decode");

		assert!(!raw.found);
		assert!(raw.source.is_none());
	}
}
