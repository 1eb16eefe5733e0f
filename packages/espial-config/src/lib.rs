mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Engine, Fields, Mapping, Metadata, Search, Service};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.engine.url.trim().is_empty() {
		return Err(Error::Validation { message: "engine.url must be non-empty.".to_string() });
	}
	if cfg.engine.index.trim().is_empty() {
		return Err(Error::Validation { message: "engine.index must be non-empty.".to_string() });
	}
	if cfg.search.results_per_page == 0 {
		return Err(Error::Validation {
			message: "search.results_per_page must be greater than zero.".to_string(),
		});
	}
	if cfg.search.more_like_this_size == 0 {
		return Err(Error::Validation {
			message: "search.more_like_this_size must be greater than zero.".to_string(),
		});
	}
	if cfg.search.similar_size == 0 {
		return Err(Error::Validation {
			message: "search.similar_size must be greater than zero.".to_string(),
		});
	}
	if cfg.metadata.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "metadata.api_base must be non-empty.".to_string(),
		});
	}
	if cfg.metadata.max_pages == 0 {
		return Err(Error::Validation {
			message: "metadata.max_pages must be greater than zero.".to_string(),
		});
	}

	for (label, path) in [
		("mapping.title", &cfg.mapping.title),
		("mapping.description", &cfg.mapping.description),
		("mapping.code", &cfg.mapping.code),
		("mapping.provider", &cfg.mapping.provider),
		("mapping.instructor", &cfg.mapping.instructor),
		("mapping.delivery_mode", &cfg.mapping.delivery_mode),
		("mapping.competency", &cfg.mapping.competency),
		("mapping.derived_from", &cfg.mapping.derived_from),
		("mapping.subject", &cfg.mapping.subject),
	] {
		if path.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	for filter in &cfg.fields.filters {
		if filter.display_name.trim().is_empty() || filter.field_name.trim().is_empty() {
			return Err(Error::Validation {
				message: "fields.filters rows need a display_name and a field_name.".to_string(),
			});
		}
	}
	for sort in &cfg.fields.sorts {
		if sort.display_name.trim().is_empty() || sort.field_name.trim().is_empty() {
			return Err(Error::Validation {
				message: "fields.sorts rows need a display_name and a field_name.".to_string(),
			});
		}
	}
	for field in &cfg.fields.search_fields {
		if field.display_name.trim().is_empty() || field.field_name.trim().is_empty() {
			return Err(Error::Validation {
				message: "fields.search_fields rows need a display_name and a field_name."
					.to_string(),
			});
		}
	}
	for spotlight in &cfg.fields.spotlights {
		if spotlight.document_id.trim().is_empty() {
			return Err(Error::Validation {
				message: "fields.spotlights rows need a document_id.".to_string(),
			});
		}
	}
	for org in &cfg.fields.organizations {
		if org.filter.trim().is_empty() {
			return Err(Error::Validation {
				message: "fields.organizations rows need a filter value.".to_string(),
			});
		}
	}

	Ok(())
}
