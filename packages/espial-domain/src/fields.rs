//! Administrator-defined field configuration entities.
//!
//! These are rows in an external configuration store, read fresh per request.
//! Each row drives one fragment of the composed search query; an inactive row
//! contributes nothing.

use serde::{Deserialize, Serialize};

/// Drives one term aggregation and one optional term filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterField {
	pub display_name: String,
	/// Metadata field path as indexed by the search engine, e.g. `Course.Provider`.
	/// Must name a keyword-typed path; see [`keyword_field`].
	pub field_name: String,
	#[serde(default)]
	pub kind: FilterKind,
	#[serde(default = "default_active")]
	pub active: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
	/// Checkbox-style exact-value filtering.
	#[default]
	Terms,
}

/// A request-supplied sort key is honored only if it matches an active
/// option's `field_name`; unmatched keys are silently ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortOption {
	pub display_name: String,
	pub field_name: String,
	#[serde(default = "default_active")]
	pub active: bool,
}

/// An extra field blended into the keyword multi-match, in addition to the
/// fixed experience mapping set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchField {
	pub display_name: String,
	pub field_name: String,
	#[serde(default = "default_active")]
	pub active: bool,
}

/// An experience document surfaced outside of search ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotlightEntry {
	pub document_id: String,
	#[serde(default = "default_active")]
	pub active: bool,
}

/// Returns the keyword-typed path for a field, as required by the engine for
/// exact match, term filtering, aggregation, and sorting.
pub fn keyword_field(field_name: &str) -> String {
	format!("{field_name}.keyword")
}

fn default_active() -> bool {
	true
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keyword_field_appends_suffix() {
		assert_eq!(keyword_field("Course.Provider"), "Course.Provider.keyword");
	}

	#[test]
	fn rows_default_to_active_terms() {
		let field: FilterField =
			serde_json::from_value(serde_json::json!({
				"display_name": "Provider",
				"field_name": "Course.Provider",
			}))
			.expect("row should deserialize");

		assert!(field.active);
		assert_eq!(field.kind, FilterKind::Terms);
	}
}
