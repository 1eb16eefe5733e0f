//! Client for the external experience metadata API.
//!
//! Given document identifiers collected elsewhere (spotlight configuration,
//! interest lists, aggregation results), this crate batches them into a single
//! lookup, follows the API's `next`-link pagination under an explicit ceiling,
//! and normalizes each record into the canonical ledger shape.

mod record;

pub use record::{normalize_record, record_hash};

use std::{collections::HashMap, time::Duration};

use serde::Deserialize;
use serde_json::Value;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Metadata request failed.")]
	Transport(#[from] reqwest::Error),
	#[error("Metadata API returned status {status}.")]
	Status { status: u16 },
	#[error("Metadata response could not be decoded: {message}")]
	Decode { message: String },
	#[error("Metadata pagination exceeded the configured ceiling of {limit} pages.")]
	PageLimitExceeded { limit: usize },
}

/// Records joined back to the identifiers that requested them.
#[derive(Debug, Default)]
pub struct ExperienceJoin {
	/// Normalized records in upstream order. A record that lacked the
	/// canonical nested shape appears as JSON null to hold its position.
	pub records: Vec<Value>,
	by_hash: HashMap<String, usize>,
}

impl ExperienceJoin {
	/// The normalized record for one identifier, if the upstream returned a
	/// usable record for it.
	pub fn get(&self, metadata_key_hash: &str) -> Option<&Value> {
		self.by_hash.get(metadata_key_hash).map(|idx| &self.records[*idx])
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}

#[derive(Debug, Deserialize)]
struct PageResponse {
	#[serde(default)]
	results: Vec<Value>,
	#[serde(default)]
	next: Option<String>,
}

pub struct MetadataClient {
	http: reqwest::Client,
	api_base: String,
	max_pages: usize,
}

impl MetadataClient {
	pub fn new(cfg: &espial_config::Metadata) -> Result<Self> {
		let http =
			reqwest::Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self { http, api_base: cfg.api_base.clone(), max_pages: cfg.max_pages })
	}

	/// Fetches and normalizes full records for a batch of identifiers.
	///
	/// An empty batch never touches the network. A non-empty batch issues one
	/// request for all identifiers and follows `next` links until the upstream
	/// reports completion; more than `max_pages` pages is an error rather than
	/// an unbounded loop.
	pub async fn fetch_experiences(&self, ids: &[String]) -> Result<ExperienceJoin> {
		if ids.is_empty() {
			return Ok(ExperienceJoin::default());
		}

		let url = format!("{}{}", self.api_base, hash_list_query(ids));
		let raw_records = self.fetch_all_pages(url).await?;

		let mut join = ExperienceJoin::default();
		for raw in &raw_records {
			let normalized = normalize_record(raw);
			if normalized.is_none() {
				tracing::warn!("Metadata record lacked the canonical ledger shape.");
			}
			let index = join.records.len();
			if let Some(hash) = normalized.as_ref().and_then(record_hash) {
				join.by_hash.insert(hash.to_string(), index);
			}
			join.records.push(normalized.unwrap_or(Value::Null));
		}

		Ok(join)
	}

	async fn fetch_all_pages(&self, first_url: String) -> Result<Vec<Value>> {
		let mut results = Vec::new();
		let mut next_url = Some(first_url);
		let mut pages = 0_usize;

		while let Some(url) = next_url {
			if pages >= self.max_pages {
				return Err(Error::PageLimitExceeded { limit: self.max_pages });
			}
			pages += 1;

			let response = self.http.get(&url).send().await?;
			let status = response.status();
			if !status.is_success() {
				return Err(Error::Status { status: status.as_u16() });
			}

			let page: PageResponse =
				response.json().await.map_err(|err| Error::Decode { message: err.to_string() })?;
			results.extend(page.results);
			next_url = page.next.filter(|next| !next.is_empty());
		}

		tracing::debug!(pages, records = results.len(), "Metadata pagination complete.");

		Ok(results)
	}
}

/// Builds the batched lookup query string: `?metadata_key_hash_list=a,b,c`.
fn hash_list_query(ids: &[String]) -> String {
	format!("?metadata_key_hash_list={}", ids.join(","))
}
