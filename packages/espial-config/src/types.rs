use espial_domain::{FilterField, Organization, SearchField, SortOption, SpotlightEntry};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub engine: Engine,
	pub search: Search,
	pub metadata: Metadata,
	pub mapping: Mapping,
	pub fields: Fields,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Engine {
	pub url: String,
	pub index: String,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	pub results_per_page: usize,
	#[serde(default = "default_more_like_this_size")]
	pub more_like_this_size: usize,
	#[serde(default = "default_similar_size")]
	pub similar_size: usize,
}

#[derive(Debug, Deserialize)]
pub struct Metadata {
	pub api_base: String,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	/// Ceiling on the number of `next` pages followed per joiner request. The
	/// upstream collection API paginates without a size bound of its own.
	#[serde(default = "default_max_pages")]
	pub max_pages: usize,
}

/// The fixed experience field mapping: where each well-known course attribute
/// lives in the index.
#[derive(Debug, Deserialize)]
pub struct Mapping {
	pub title: String,
	pub description: String,
	pub code: String,
	pub provider: String,
	pub instructor: String,
	pub delivery_mode: String,
	pub competency: String,
	pub derived_from: String,
	pub subject: String,
}

/// Administrator-defined field configuration, the data behind the
/// `FieldConfigProvider` seam.
#[derive(Debug, Deserialize)]
pub struct Fields {
	#[serde(default)]
	pub filters: Vec<FilterField>,
	#[serde(default)]
	pub sorts: Vec<SortOption>,
	#[serde(default)]
	pub search_fields: Vec<SearchField>,
	#[serde(default)]
	pub spotlights: Vec<SpotlightEntry>,
	#[serde(default)]
	pub organizations: Vec<Organization>,
}

fn default_timeout_ms() -> u64 {
	3_000
}

fn default_more_like_this_size() -> usize {
	6
}

fn default_similar_size() -> usize {
	4
}

fn default_max_pages() -> usize {
	200
}
