//! Query composition: layering request fragments onto one engine query in a
//! fixed order — base query, visibility, term filters, aggregations, sort,
//! pagination window. Each step narrows or annotates the query, never
//! replaces prior state.

use std::collections::BTreeMap;

use espial_domain::{FilterField, SearchField, SortOption, keyword_field, page_start};
use espial_engine::SearchQuery;

use crate::error::{ServiceError, ServiceResult};

/// Raw request parameters, as decoded from the query string. Values are
/// multi-valued: a repeated parameter selects any of its values.
pub type Params = BTreeMap<String, Vec<String>>;

/// Parameter names that never become term filters. A fixed contract, by
/// name — not a configuration lookup.
const RESERVED_PARAMS: [&str; 2] = ["page", "sort"];

/// A keyword search request as received from the caller.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
	pub keyword: String,
	pub params: Params,
}

/// Parses the `page` parameter. Absent means the first page; a value that is
/// not an integer is a usage error, never a silent default.
pub fn parse_page(params: &Params) -> ServiceResult<i64> {
	match params.get("page").and_then(|values| values.first()) {
		None => Ok(1),
		Some(raw) => raw
			.trim()
			.parse()
			.map_err(|_| ServiceError::InvalidPage { value: raw.clone() }),
	}
}

/// Resolves the `[start, start + size)` result window for a request.
pub fn page_window(params: &Params, page_size: usize) -> ServiceResult<(usize, usize)> {
	let page = parse_page(params)?;

	Ok((page_start(page, page_size), page_size))
}

/// Adds one exact-match terms filter per non-reserved request parameter, on
/// the parameter name's keyword-typed path.
pub fn apply_term_filters(query: SearchQuery, params: &Params) -> SearchQuery {
	params
		.iter()
		.filter(|(name, _)| !RESERVED_PARAMS.contains(&name.as_str()))
		.fold(query, |query, (name, values)| query.filter_terms(&keyword_field(name), values))
}

/// Adds one term-aggregation bucket per active filter field, keyed by the
/// field's display name. Independent of whether the field also appears in the
/// current term filters.
pub fn apply_aggregations(query: SearchQuery, filter_fields: &[FilterField]) -> SearchQuery {
	filter_fields
		.iter()
		.filter(|field| field.active)
		.fold(query, |query, field| {
			query.aggregate(&field.display_name, &keyword_field(&field.field_name))
		})
}

/// Applies at most one sort clause. The request's `sort` value is honored
/// only when it exactly matches an active sort option's field name; any other
/// value leaves the engine's relevance ranking in place.
pub fn apply_sort(query: SearchQuery, params: &Params, sort_options: &[SortOption]) -> SearchQuery {
	let Some(key) = params.get("sort").and_then(|values| values.first()) else {
		return query;
	};
	let allowed = sort_options.iter().any(|option| option.active && option.field_name == *key);
	if !allowed {
		return query;
	}

	query.sort_by(&keyword_field(key))
}

/// The multi-match field list for keyword search: the fixed experience
/// mapping set plus every active administrator-defined search field.
pub fn keyword_search_fields(
	mapping: &espial_config::Mapping,
	extra: &[SearchField],
) -> Vec<String> {
	let mut fields = vec![
		mapping.title.clone(),
		mapping.description.clone(),
		mapping.code.clone(),
		mapping.provider.clone(),
		mapping.instructor.clone(),
		mapping.delivery_mode.clone(),
		mapping.competency.clone(),
	];
	fields.extend(
		extra.iter().filter(|field| field.active).map(|field| field.field_name.clone()),
	);

	fields
}
