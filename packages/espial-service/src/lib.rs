pub mod compose;
mod error;
pub mod records;
pub mod search;
pub mod shape;
pub mod suggest;
pub mod visibility;

use std::{future::Future, pin::Pin, sync::Arc};

use espial_config::Config;
use espial_domain::{FilterField, Organization, SearchField, SortOption, SpotlightEntry};
use espial_engine::EngineClient;
use espial_metadata::MetadataClient;

pub use compose::{Params, SearchRequest};
pub use error::{ServiceError, ServiceResult};
pub use shape::SearchEnvelope;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read-only access to the administrator-defined field configuration.
///
/// Configuration is mutated outside this service and read fresh per request;
/// there is no snapshotting and no staleness tolerance built in.
pub trait FieldConfigProvider
where
	Self: Send + Sync,
{
	fn filter_fields<'a>(
		&'a self,
		cfg: &'a espial_config::Fields,
	) -> BoxFuture<'a, color_eyre::Result<Vec<FilterField>>>;

	fn sort_options<'a>(
		&'a self,
		cfg: &'a espial_config::Fields,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SortOption>>>;

	fn search_fields<'a>(
		&'a self,
		cfg: &'a espial_config::Fields,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SearchField>>>;

	fn spotlight_entries<'a>(
		&'a self,
		cfg: &'a espial_config::Fields,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SpotlightEntry>>>;

	fn organizations<'a>(
		&'a self,
		cfg: &'a espial_config::Fields,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Organization>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub fields: Arc<dyn FieldConfigProvider>,
}

impl Providers {
	pub fn new(fields: Arc<dyn FieldConfigProvider>) -> Self {
		Self { fields }
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self { fields: Arc::new(ConfigFieldProvider) }
	}
}

/// Default provider: serves the rows from the `[fields]` config section.
struct ConfigFieldProvider;

impl FieldConfigProvider for ConfigFieldProvider {
	fn filter_fields<'a>(
		&'a self,
		cfg: &'a espial_config::Fields,
	) -> BoxFuture<'a, color_eyre::Result<Vec<FilterField>>> {
		Box::pin(async move { Ok(cfg.filters.clone()) })
	}

	fn sort_options<'a>(
		&'a self,
		cfg: &'a espial_config::Fields,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SortOption>>> {
		Box::pin(async move { Ok(cfg.sorts.clone()) })
	}

	fn search_fields<'a>(
		&'a self,
		cfg: &'a espial_config::Fields,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SearchField>>> {
		Box::pin(async move { Ok(cfg.search_fields.clone()) })
	}

	fn spotlight_entries<'a>(
		&'a self,
		cfg: &'a espial_config::Fields,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SpotlightEntry>>> {
		Box::pin(async move { Ok(cfg.spotlights.clone()) })
	}

	fn organizations<'a>(
		&'a self,
		cfg: &'a espial_config::Fields,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Organization>>> {
		Box::pin(async move { Ok(cfg.organizations.clone()) })
	}
}

/// The search orchestration layer. Each request is handled independently;
/// there is no shared mutable state across requests.
pub struct EspialService {
	pub cfg: Config,
	pub engine: EngineClient,
	pub metadata: MetadataClient,
	pub providers: Providers,
}

impl EspialService {
	pub fn new(cfg: Config, engine: EngineClient, metadata: MetadataClient) -> Self {
		Self { cfg, engine, metadata, providers: Providers::default() }
	}

	pub fn with_providers(
		cfg: Config,
		engine: EngineClient,
		metadata: MetadataClient,
		providers: Providers,
	) -> Self {
		Self { cfg, engine, metadata, providers }
	}
}
