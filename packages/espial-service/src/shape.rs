//! Reshaping raw engine responses into the stable API envelope.

use espial_domain::FilterField;
use espial_engine::RawSearchResponse;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::{ServiceError, ServiceResult};

/// The stable response envelope for every document search operation.
#[derive(Debug, Clone, Serialize)]
pub struct SearchEnvelope {
	/// Document fields plus an injected `meta { id, index }` object.
	pub hits: Vec<Value>,
	/// Engine-reported total matching count, not the page size.
	pub total: u64,
	/// One entry per aggregation bucket, enriched with the raw `field_name`
	/// behind the bucket's display name.
	pub aggregations: Map<String, Value>,
}

/// Builds the envelope from an executed response.
///
/// Every aggregation key must resolve to an active filter field by display
/// name — buckets are only ever created from that configuration, so a
/// non-resolving key means the configuration changed under the query and the
/// response can no longer be labeled truthfully.
pub fn shape_results(
	raw: RawSearchResponse,
	filter_fields: &[FilterField],
) -> ServiceResult<SearchEnvelope> {
	let total = raw.hits.total.value;

	let mut hits = Vec::with_capacity(raw.hits.hits.len());
	for hit in raw.hits.hits {
		let mut fields = hit.source;
		fields.insert("meta".to_string(), json!({ "id": hit.id, "index": hit.index }));
		hits.push(Value::Object(fields));
	}

	let mut aggregations = Map::new();
	for (key, bucket) in raw.aggregations {
		let field = filter_fields
			.iter()
			.find(|field| field.active && field.display_name == key)
			.ok_or_else(|| ServiceError::ConfigIntegrity {
				message: format!("Aggregation bucket {key:?} matches no active filter field."),
			})?;
		let Value::Object(mut bucket) = bucket else {
			return Err(ServiceError::ConfigIntegrity {
				message: format!("Aggregation bucket {key:?} is not an object."),
			});
		};
		bucket.insert("field_name".to_string(), Value::String(field.field_name.clone()));
		aggregations.insert(key, Value::Object(bucket));
	}

	Ok(SearchEnvelope { hits, total, aggregations })
}
