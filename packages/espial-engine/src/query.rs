use serde_json::{Map, Value, json};

/// Leaf clause constructors for the engine's structured query language.
pub mod clause {
	use super::*;

	/// Full-text match over several analyzed fields at once.
	pub fn multi_match(keyword: &str, fields: &[String]) -> Value {
		json!({ "multi_match": { "query": keyword, "fields": fields } })
	}

	/// Match on a single field.
	pub fn match_field(field: &str, value: &str) -> Value {
		json!({ "match": { field: value } })
	}

	/// Similarity query seeded by an already-indexed document.
	pub fn more_like_this(index: &str, doc_id: &str, fields: &[String]) -> Value {
		json!({
			"more_like_this": {
				"fields": fields,
				"like": [{ "_index": index, "_id": doc_id }],
			}
		})
	}

	/// Exact-match filter requiring the field to hold one of `values`.
	pub fn terms(field: &str, values: &[String]) -> Value {
		json!({ "terms": { field: values } })
	}
}

/// One in-progress engine query. Request-local: created at the start of a
/// request, rendered once with [`SearchQuery::body`], and discarded. Builder
/// methods consume and return the value, so no step can observe a
/// partially-applied mutation from another step.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
	must: Vec<Value>,
	should: Vec<Value>,
	minimum_should_match: Option<u32>,
	filter: Vec<Value>,
	aggregations: Vec<(String, String)>,
	sort: Option<String>,
	window: Option<(usize, usize)>,
	suggest: Option<Value>,
}

impl SearchQuery {
	pub fn new() -> Self {
		Self::default()
	}

	/// ANDs a clause into the query.
	pub fn query(mut self, clause: Value) -> Self {
		self.must.push(clause);
		self
	}

	/// ORs a group of clauses into the query; at least one must match.
	pub fn should_any(mut self, clauses: Vec<Value>) -> Self {
		if clauses.is_empty() {
			return self;
		}
		self.should.extend(clauses);
		self.minimum_should_match = Some(1);
		self
	}

	/// Adds an exact-match term filter on `field`.
	pub fn filter_terms(mut self, field: &str, values: &[String]) -> Self {
		self.filter.push(clause::terms(field, values));
		self
	}

	/// Adds one named term aggregation bucketing on `field`.
	pub fn aggregate(mut self, name: &str, field: &str) -> Self {
		self.aggregations.push((name.to_string(), field.to_string()));
		self
	}

	/// Sorts by a single field, replacing any prior sort.
	pub fn sort_by(mut self, field: &str) -> Self {
		self.sort = Some(field.to_string());
		self
	}

	/// Restricts results to the half-open slice `[start, start + size)`.
	pub fn window(mut self, start: usize, size: usize) -> Self {
		self.window = Some((start, size));
		self
	}

	/// Attaches a fuzzy completion suggestion on the `autocomplete` field.
	/// The engine requires a non-empty context filter for this suggester;
	/// callers enforce that before reaching here.
	pub fn suggest_completion(mut self, partial: &str, contexts: &[String]) -> Self {
		self.suggest = Some(json!({
			"autocomplete_suggestion": {
				"prefix": partial,
				"completion": {
					"field": "autocomplete",
					"fuzzy": { "fuzziness": "AUTO" },
					"contexts": { "filter": contexts },
				},
			}
		}));
		self
	}

	/// Renders the JSON wire body. Sections without content are omitted; a
	/// query with no clauses at all matches every document.
	pub fn body(&self) -> Value {
		let mut body = Map::new();

		body.insert("query".to_string(), self.query_section());

		if !self.aggregations.is_empty() {
			let mut aggs = Map::new();
			for (name, field) in &self.aggregations {
				aggs.insert(name.clone(), json!({ "terms": { "field": field } }));
			}
			body.insert("aggs".to_string(), Value::Object(aggs));
		}
		if let Some(field) = &self.sort {
			body.insert("sort".to_string(), json!([field]));
		}
		if let Some((start, size)) = self.window {
			body.insert("from".to_string(), json!(start));
			body.insert("size".to_string(), json!(size));
		}
		if let Some(suggest) = &self.suggest {
			body.insert("suggest".to_string(), suggest.clone());
		}

		Value::Object(body)
	}

	fn query_section(&self) -> Value {
		if self.must.is_empty() && self.should.is_empty() && self.filter.is_empty() {
			return json!({ "match_all": {} });
		}

		let mut bool_query = Map::new();
		if !self.must.is_empty() {
			bool_query.insert("must".to_string(), Value::Array(self.must.clone()));
		}
		if !self.should.is_empty() {
			bool_query.insert("should".to_string(), Value::Array(self.should.clone()));
			if let Some(min) = self.minimum_should_match {
				bool_query.insert("minimum_should_match".to_string(), json!(min));
			}
		}
		if !self.filter.is_empty() {
			bool_query.insert("filter".to_string(), Value::Array(self.filter.clone()));
		}

		json!({ "bool": Value::Object(bool_query) })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_query_matches_all() {
		let body = SearchQuery::new().body();

		assert_eq!(body["query"], json!({ "match_all": {} }));
		assert!(body.get("aggs").is_none());
		assert!(body.get("sort").is_none());
		assert!(body.get("from").is_none());
	}

	#[test]
	fn must_and_should_render_into_one_bool() {
		let body = SearchQuery::new()
			.query(clause::match_field("Course.CourseCompetency", "abc"))
			.should_any(vec![
				clause::match_field("filter", "org-a"),
				clause::match_field("filter", "org-b"),
			])
			.body();
		let bool_query = &body["query"]["bool"];

		assert_eq!(bool_query["must"].as_array().map(Vec::len), Some(1));
		assert_eq!(bool_query["should"].as_array().map(Vec::len), Some(2));
		assert_eq!(bool_query["minimum_should_match"], json!(1));
	}

	#[test]
	fn empty_should_group_changes_nothing() {
		let body = SearchQuery::new()
			.query(clause::match_field("Course.CourseTitle", "rust"))
			.should_any(Vec::new())
			.body();

		assert!(body["query"]["bool"].get("should").is_none());
		assert!(body["query"]["bool"].get("minimum_should_match").is_none());
	}

	#[test]
	fn filters_render_as_terms_on_the_given_field() {
		let body = SearchQuery::new()
			.filter_terms("Course.CourseProviderName.keyword", &["DAU".to_string()])
			.body();

		assert_eq!(
			body["query"]["bool"]["filter"][0],
			json!({ "terms": { "Course.CourseProviderName.keyword": ["DAU"] } })
		);
	}

	#[test]
	fn aggregations_keyed_by_name() {
		let body = SearchQuery::new()
			.aggregate("Provider", "Course.CourseProviderName.keyword")
			.aggregate("Delivery", "Course.CourseDeliveryMode.keyword")
			.body();

		assert_eq!(
			body["aggs"]["Provider"],
			json!({ "terms": { "field": "Course.CourseProviderName.keyword" } })
		);
		assert_eq!(body["aggs"].as_object().map(Map::len), Some(2));
	}

	#[test]
	fn window_renders_from_and_size() {
		let body = SearchQuery::new().window(40, 8).body();

		assert_eq!(body["from"], json!(40));
		assert_eq!(body["size"], json!(8));
	}

	#[test]
	fn suggest_carries_fuzzy_completion_and_contexts() {
		let body = SearchQuery::new()
			.suggest_completion("intro", &["org-a".to_string(), "org-b".to_string()])
			.body();
		let completion = &body["suggest"]["autocomplete_suggestion"]["completion"];

		assert_eq!(body["suggest"]["autocomplete_suggestion"]["prefix"], json!("intro"));
		assert_eq!(completion["field"], json!("autocomplete"));
		assert_eq!(completion["fuzzy"]["fuzziness"], json!("AUTO"));
		assert_eq!(completion["contexts"]["filter"], json!(["org-a", "org-b"]));
	}

	#[test]
	fn more_like_this_seeds_from_document() {
		let clause = clause::more_like_this("experiences", "doc-1", &[
			"Course.CourseTitle".to_string(),
			"Course.CourseShortDescription".to_string(),
		]);

		assert_eq!(
			clause["more_like_this"]["like"],
			json!([{ "_index": "experiences", "_id": "doc-1" }])
		);
	}
}
