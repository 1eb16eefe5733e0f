//! Document search operations. Each builds one engine query by layering, in
//! order: base query, visibility clause, term filters, aggregations, sort,
//! pagination window — then executes it and shapes the response envelope.

use espial_domain::{FilterField, Organization, Requester, SearchField, SortOption, page_start};
use espial_engine::{SearchQuery, clause};
use serde_json::json;

use crate::{
	EspialService,
	compose::{
		self, Params, SearchRequest, apply_aggregations, apply_sort, apply_term_filters,
		page_window,
	},
	error::ServiceResult,
	shape::{SearchEnvelope, shape_results},
	visibility::apply_visibility,
};

impl EspialService {
	/// Full-text keyword search with the complete layering: configured search
	/// fields, visibility, term filters, aggregations, sort, pagination.
	pub async fn search_by_keyword(
		&self,
		requester: &Requester,
		request: &SearchRequest,
	) -> ServiceResult<SearchEnvelope> {
		let fields = &self.cfg.fields;
		let search_fields = self.providers.fields.search_fields(fields).await?;
		let filter_fields = self.providers.fields.filter_fields(fields).await?;
		let sort_options = self.providers.fields.sort_options(fields).await?;
		let organizations = self.providers.fields.organizations(fields).await?;

		let query = build_keyword_query(BuildKeywordArgs {
			cfg: &self.cfg,
			requester,
			organizations: &organizations,
			request,
			search_fields: &search_fields,
			filter_fields: &filter_fields,
			sort_options: &sort_options,
		})?;
		let raw = self.engine.search(&query).await?;

		shape_results(raw, &filter_fields)
	}

	/// Exact match on the competency mapping field.
	pub async fn search_by_competency(
		&self,
		requester: &Requester,
		competency: &str,
		params: &Params,
	) -> ServiceResult<SearchEnvelope> {
		self.field_match_search(requester, &self.cfg.mapping.competency, competency, params).await
	}

	/// Exact match on the derived-from reference field: experiences derived
	/// from the given source record.
	pub async fn search_for_derived(
		&self,
		requester: &Requester,
		reference: &str,
		params: &Params,
	) -> ServiceResult<SearchEnvelope> {
		self.field_match_search(requester, &self.cfg.mapping.derived_from, reference, params).await
	}

	/// Experiences similar to an already-indexed document, judged on title,
	/// description, and provider.
	pub async fn more_like_this(
		&self,
		requester: &Requester,
		doc_id: &str,
	) -> ServiceResult<SearchEnvelope> {
		let organizations = self.providers.fields.organizations(&self.cfg.fields).await?;
		let query = build_more_like_this_query(
			&self.cfg,
			&self.engine.index,
			requester,
			&organizations,
			doc_id,
		);
		let raw = self.engine.search(&query).await?;

		shape_results(raw, &[])
	}

	/// A small set of experiences with similar competencies or subjects.
	pub async fn similar_experiences(
		&self,
		requester: &Requester,
		keyword: &str,
	) -> ServiceResult<SearchEnvelope> {
		let organizations = self.providers.fields.organizations(&self.cfg.fields).await?;
		let query = build_similar_query(&self.cfg, requester, &organizations, keyword);
		let raw = self.engine.search(&query).await?;

		shape_results(raw, &[])
	}

	/// ANDed match clauses over caller-chosen fields, paginated. The base
	/// query here is the filters themselves; no aggregations or sort.
	pub async fn search_by_fields(
		&self,
		requester: &Requester,
		page_number: i64,
		field_matches: &Params,
	) -> ServiceResult<SearchEnvelope> {
		let organizations = self.providers.fields.organizations(&self.cfg.fields).await?;
		let query = build_field_match_query(
			&self.cfg,
			requester,
			&organizations,
			page_number,
			field_matches,
		);
		let raw = self.engine.search(&query).await?;

		shape_results(raw, &[])
	}

	/// Active spotlighted documents, fetched straight from the index in one
	/// batched call.
	pub async fn spotlight_documents(&self) -> ServiceResult<Vec<serde_json::Value>> {
		let entries = self.providers.fields.spotlight_entries(&self.cfg.fields).await?;
		let ids: Vec<String> = entries
			.iter()
			.filter(|entry| entry.active)
			.map(|entry| entry.document_id.clone())
			.collect();
		let docs = self.engine.get_documents(&ids).await?;

		let mut result = Vec::new();
		for doc in docs {
			let Some(mut fields) = doc.source else {
				tracing::warn!(id = %doc.id, "Spotlighted document is missing from the index.");
				continue;
			};
			fields.insert("meta".to_string(), json!({ "id": doc.id, "index": doc.index }));
			result.push(serde_json::Value::Object(fields));
		}

		Ok(result)
	}

	async fn field_match_search(
		&self,
		requester: &Requester,
		field: &str,
		value: &str,
		params: &Params,
	) -> ServiceResult<SearchEnvelope> {
		let organizations = self.providers.fields.organizations(&self.cfg.fields).await?;
		let query = build_match_query(&self.cfg, requester, &organizations, field, value, params)?;
		let raw = self.engine.search(&query).await?;

		shape_results(raw, &[])
	}
}

pub(crate) struct BuildKeywordArgs<'a> {
	pub(crate) cfg: &'a espial_config::Config,
	pub(crate) requester: &'a Requester,
	pub(crate) organizations: &'a [Organization],
	pub(crate) request: &'a SearchRequest,
	pub(crate) search_fields: &'a [SearchField],
	pub(crate) filter_fields: &'a [FilterField],
	pub(crate) sort_options: &'a [SortOption],
}

pub(crate) fn build_keyword_query(args: BuildKeywordArgs<'_>) -> ServiceResult<SearchQuery> {
	let BuildKeywordArgs {
		cfg,
		requester,
		organizations,
		request,
		search_fields,
		filter_fields,
		sort_options,
	} = args;
	let fields = compose::keyword_search_fields(&cfg.mapping, search_fields);
	let (start, size) = page_window(&request.params, cfg.search.results_per_page)?;

	let query = SearchQuery::new().query(clause::multi_match(&request.keyword, &fields));
	let query = apply_visibility(query, requester, organizations);
	let query = apply_term_filters(query, &request.params);
	let query = apply_aggregations(query, filter_fields);
	let query = apply_sort(query, &request.params, sort_options);

	Ok(query.window(start, size))
}

pub(crate) fn build_match_query(
	cfg: &espial_config::Config,
	requester: &Requester,
	organizations: &[Organization],
	field: &str,
	value: &str,
	params: &Params,
) -> ServiceResult<SearchQuery> {
	let (start, size) = page_window(params, cfg.search.results_per_page)?;
	let query = SearchQuery::new().query(clause::match_field(field, value));
	let query = apply_visibility(query, requester, organizations);

	Ok(query.window(start, size))
}

pub(crate) fn build_more_like_this_query(
	cfg: &espial_config::Config,
	index: &str,
	requester: &Requester,
	organizations: &[Organization],
	doc_id: &str,
) -> SearchQuery {
	let fields = vec![
		cfg.mapping.title.clone(),
		cfg.mapping.description.clone(),
		cfg.mapping.provider.clone(),
	];
	let query = SearchQuery::new().query(clause::more_like_this(index, doc_id, &fields));
	let query = apply_visibility(query, requester, organizations);

	query.window(0, cfg.search.more_like_this_size)
}

pub(crate) fn build_similar_query(
	cfg: &espial_config::Config,
	requester: &Requester,
	organizations: &[Organization],
	keyword: &str,
) -> SearchQuery {
	let fields = vec![cfg.mapping.competency.clone(), cfg.mapping.subject.clone()];
	let query = SearchQuery::new().query(clause::multi_match(keyword, &fields));
	let query = apply_visibility(query, requester, organizations);

	query.window(0, cfg.search.similar_size)
}

pub(crate) fn build_field_match_query(
	cfg: &espial_config::Config,
	requester: &Requester,
	organizations: &[Organization],
	page_number: i64,
	field_matches: &Params,
) -> SearchQuery {
	let query = field_matches.iter().fold(SearchQuery::new(), |query, (field, values)| {
		values.iter().fold(query, |query, value| query.query(clause::match_field(field, value)))
	});
	let query = apply_visibility(query, requester, organizations);
	let size = cfg.search.results_per_page;

	query.window(page_start(page_number, size), size)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn test_config() -> espial_config::Config {
		let raw = r#"
			[service]
			http_bind = "127.0.0.1:8080"
			log_level = "info"

			[engine]
			url   = "http://127.0.0.1:9200"
			index = "experiences"

			[search]
			results_per_page = 8

			[metadata]
			api_base = "http://127.0.0.1:8100/api/metadata/"

			[mapping]
			title         = "Course.CourseTitle"
			description   = "Course.CourseShortDescription"
			code          = "Course.CourseCode"
			provider      = "Course.CourseProviderName"
			instructor    = "Course.CourseInstructor"
			delivery_mode = "Course.CourseDeliveryMode"
			competency    = "Course.CourseCompetency"
			derived_from  = "Course.DerivedFrom"
			subject       = "Course.CourseSubject"

			[fields]
		"#;

		toml::from_str(raw).expect("test config should parse")
	}

	fn org(filter: &str) -> Organization {
		Organization { name: filter.to_string(), filter: filter.to_string() }
	}

	fn one_param(name: &str, value: &str) -> Params {
		let mut params = Params::new();
		params.insert(name.to_string(), vec![value.to_string()]);
		params
	}

	#[test]
	fn keyword_query_layers_every_fragment() {
		let cfg = test_config();
		let mut params = one_param("page", "6");
		params.insert("Course.CourseProviderName".to_string(), vec!["DAU".to_string()]);
		params.insert("sort".to_string(), vec!["Course.CourseTitle".to_string()]);
		let request = SearchRequest { keyword: "rust".to_string(), params };
		let filter_fields = vec![FilterField {
			display_name: "Provider".to_string(),
			field_name: "Course.CourseProviderName".to_string(),
			kind: Default::default(),
			active: true,
		}];
		let sort_options = vec![SortOption {
			display_name: "Title".to_string(),
			field_name: "Course.CourseTitle".to_string(),
			active: true,
		}];
		let requester = Requester::User { organizations: vec![org("o1"), org("o2")] };

		let body = build_keyword_query(BuildKeywordArgs {
			cfg: &cfg,
			requester: &requester,
			organizations: &[],
			request: &request,
			search_fields: &[],
			filter_fields: &filter_fields,
			sort_options: &sort_options,
		})
		.expect("query should build")
		.body();

		let bool_query = &body["query"]["bool"];
		assert_eq!(
			bool_query["must"][0]["multi_match"]["query"],
			serde_json::json!("rust")
		);
		assert_eq!(bool_query["should"].as_array().map(Vec::len), Some(2));
		assert_eq!(bool_query["minimum_should_match"], serde_json::json!(1));
		assert_eq!(bool_query["filter"].as_array().map(Vec::len), Some(1));
		assert!(body["aggs"].get("Provider").is_some());
		assert_eq!(body["sort"], serde_json::json!(["Course.CourseTitle.keyword"]));
		assert_eq!(body["from"], serde_json::json!(40));
		assert_eq!(body["size"], serde_json::json!(8));
	}

	#[test]
	fn keyword_query_rejects_non_numeric_page() {
		let cfg = test_config();
		let request =
			SearchRequest { keyword: "rust".to_string(), params: one_param("page", "abc") };

		let err = build_keyword_query(BuildKeywordArgs {
			cfg: &cfg,
			requester: &Requester::Anonymous,
			organizations: &[],
			request: &request,
			search_fields: &[],
			filter_fields: &[],
			sort_options: &[],
		})
		.expect_err("non-numeric page must fail");

		assert!(matches!(err, crate::ServiceError::InvalidPage { .. }));
	}

	#[test]
	fn match_query_carries_only_base_visibility_and_window() {
		let cfg = test_config();
		let body = build_match_query(
			&cfg,
			&Requester::Anonymous,
			&[org("o1")],
			"Course.CourseCompetency",
			"comp-1",
			&Params::new(),
		)
		.expect("query should build")
		.body();

		assert_eq!(
			body["query"]["bool"]["must"][0],
			serde_json::json!({ "match": { "Course.CourseCompetency": "comp-1" } })
		);
		assert!(body.get("aggs").is_none());
		assert!(body.get("sort").is_none());
		assert_eq!(body["from"], serde_json::json!(0));
	}

	#[test]
	fn more_like_this_uses_similarity_fields_and_fixed_window() {
		let cfg = test_config();
		let body =
			build_more_like_this_query(&cfg, "experiences", &Requester::Anonymous, &[], "doc-9")
				.body();
		let mlt = &body["query"]["bool"]["must"][0]["more_like_this"];

		assert_eq!(
			mlt["fields"],
			serde_json::json!([
				"Course.CourseTitle",
				"Course.CourseShortDescription",
				"Course.CourseProviderName",
			])
		);
		assert_eq!(body["from"], serde_json::json!(0));
		assert_eq!(body["size"], serde_json::json!(6));
	}

	#[test]
	fn similar_query_matches_competency_and_subject() {
		let cfg = test_config();
		let body = build_similar_query(&cfg, &Requester::Anonymous, &[], "logistics").body();

		assert_eq!(
			body["query"]["bool"]["must"][0]["multi_match"]["fields"],
			serde_json::json!(["Course.CourseCompetency", "Course.CourseSubject"])
		);
		assert_eq!(body["size"], serde_json::json!(4));
	}

	#[test]
	fn field_match_query_ands_every_pair() {
		let cfg = test_config();
		let mut matches = Params::new();
		matches.insert("Course.CourseTitle".to_string(), vec!["Intro".to_string()]);
		matches.insert("Course.CourseCode".to_string(), vec!["CS-101".to_string()]);

		let body =
			build_field_match_query(&cfg, &Requester::Anonymous, &[], 2, &matches).body();

		assert_eq!(body["query"]["bool"]["must"].as_array().map(Vec::len), Some(2));
		assert_eq!(body["from"], serde_json::json!(8));
	}
}
