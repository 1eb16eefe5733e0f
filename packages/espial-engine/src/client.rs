use std::time::Duration;

use serde_json::json;

use crate::{
	Result,
	error::Error,
	query::SearchQuery,
	response::{RawDocument, RawSearchResponse},
};

/// Thin transport to the document search engine. Read-only: this layer never
/// writes to the index.
pub struct EngineClient {
	http: reqwest::Client,
	url: String,
	pub index: String,
}

impl EngineClient {
	pub fn new(cfg: &espial_config::Engine) -> Result<Self> {
		let http =
			reqwest::Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self {
			http,
			url: cfg.url.trim_end_matches('/').to_string(),
			index: cfg.index.clone(),
		})
	}

	/// Executes one composed query against the index.
	pub async fn search(&self, query: &SearchQuery) -> Result<RawSearchResponse> {
		let body = query.body();
		tracing::debug!(index = %self.index, body = %body, "Executing engine query.");

		let response = self
			.http
			.post(format!("{}/{}/_search", self.url, self.index))
			.json(&body)
			.send()
			.await?;
		let status = response.status();
		if !status.is_success() {
			return Err(Error::Status { status: status.as_u16() });
		}

		response.json().await.map_err(|err| Error::Decode { message: err.to_string() })
	}

	/// Fetches documents by id in one batched call. Ids missing from the
	/// index come back with `found == false`; callers decide what to drop.
	pub async fn get_documents(&self, ids: &[String]) -> Result<Vec<RawDocument>> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}

		let response = self
			.http
			.post(format!("{}/{}/_mget", self.url, self.index))
			.json(&json!({ "ids": ids }))
			.send()
			.await?;
		let status = response.status();
		if !status.is_success() {
			return Err(Error::Status { status: status.as_u16() });
		}

		let decoded: MgetResponse =
			response.json().await.map_err(|err| Error::Decode { message: err.to_string() })?;

		Ok(decoded.docs)
	}
}

#[derive(Debug, serde::Deserialize)]
struct MgetResponse {
	docs: Vec<RawDocument>,
}
