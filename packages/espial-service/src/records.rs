//! Experience record operations backed by the external metadata catalog.

use serde_json::Value;

use crate::{
	EspialService,
	error::{ServiceError, ServiceResult},
};

impl EspialService {
	/// Full catalog records for the active spotlighted experiences. Records
	/// arrive in the catalog's response order, which need not match the
	/// spotlight configuration order.
	pub async fn spotlight_experiences(&self) -> ServiceResult<Vec<Value>> {
		let entries = self.providers.fields.spotlight_entries(&self.cfg.fields).await?;
		let ids: Vec<String> = entries
			.into_iter()
			.filter(|entry| entry.active)
			.map(|entry| entry.document_id)
			.collect();
		let join = self.metadata.fetch_experiences(&ids).await?;

		Ok(join.records)
	}

	/// Full catalog records for a caller-supplied hash list. Hashes the
	/// catalog does not know come back as null placeholders, preserving
	/// positions.
	pub async fn experiences_by_ids(&self, ids: &[String]) -> ServiceResult<Vec<Value>> {
		let join = self.metadata.fetch_experiences(ids).await?;

		Ok(join.records)
	}

	/// One catalog record by its metadata key hash.
	pub async fn experience_by_hash(&self, hash: &str) -> ServiceResult<Value> {
		let join = self.metadata.fetch_experiences(&[hash.to_string()]).await?;

		join.get(hash).cloned().ok_or_else(|| ServiceError::NotFound {
			message: format!("No experience record for hash {hash:?}."),
		})
	}
}
