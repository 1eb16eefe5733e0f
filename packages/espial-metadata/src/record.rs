use serde_json::{Value, json};

/// Extracts the canonical nested ledger from one raw metadata API record.
///
/// The API wraps each experience in `{ metadata: { Metadata_Ledger,
/// Supplemental_Ledger? }, unique_record_identifier, metadata_key_hash }`.
/// The normalized form is the `Metadata_Ledger` object with the supplemental
/// ledger and a `meta { id, metadata_key_hash }` pair attached. A record
/// without the expected nesting normalizes to nothing; callers must tolerate
/// absent entries.
pub fn normalize_record(raw: &Value) -> Option<Value> {
	let metadata = raw.get("metadata")?;
	let ledger = metadata.get("Metadata_Ledger")?.as_object()?;

	let mut record = ledger.clone();
	record.insert(
		"Supplemental_Ledger".to_string(),
		metadata.get("Supplemental_Ledger").cloned().unwrap_or(Value::Null),
	);
	record.insert(
		"meta".to_string(),
		json!({
			"id": raw.get("unique_record_identifier").cloned().unwrap_or(Value::Null),
			"metadata_key_hash": raw.get("metadata_key_hash").cloned().unwrap_or(Value::Null),
		}),
	);

	Some(Value::Object(record))
}

/// Returns the value of `meta.metadata_key_hash` on a normalized record.
pub fn record_hash(record: &Value) -> Option<&str> {
	record.get("meta")?.get("metadata_key_hash")?.as_str()
}
