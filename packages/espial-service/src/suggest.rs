//! Fuzzy autocomplete suggestions, scoped to organization contexts.

use espial_domain::{Organization, Requester};
use espial_engine::SearchQuery;
use serde_json::Value;

use crate::{
	EspialService,
	error::{ServiceError, ServiceResult},
};

impl EspialService {
	/// Completion suggestions for a partial keyword. The suggester's context
	/// filter is mandatory, so a system with no organizations at all cannot
	/// serve suggestions and says so instead of sending an invalid query.
	pub async fn suggest(&self, requester: &Requester, partial: &str) -> ServiceResult<Value> {
		let organizations = self.providers.fields.organizations(&self.cfg.fields).await?;
		let contexts = suggest_contexts(requester, &organizations)?;
		let raw = self.engine.search(&build_suggest_query(partial, &contexts)).await?;

		Ok(raw.suggest.unwrap_or(Value::Null))
	}
}

/// The context filter values for a requester, deduplicated in first-seen
/// order. A member suggests within their own organizations; everyone else
/// suggests across all of them.
pub fn suggest_contexts(
	requester: &Requester,
	all_orgs: &[Organization],
) -> ServiceResult<Vec<String>> {
	let orgs = match requester {
		Requester::User { organizations } if !organizations.is_empty() => organizations.as_slice(),
		_ => all_orgs,
	};
	if orgs.is_empty() {
		return Err(ServiceError::NotFound {
			message: "No organizations are configured for suggestions.".to_string(),
		});
	}

	let mut contexts = Vec::with_capacity(orgs.len());
	for org in orgs {
		if !contexts.contains(&org.filter) {
			contexts.push(org.filter.clone());
		}
	}

	Ok(contexts)
}

pub fn build_suggest_query(partial: &str, contexts: &[String]) -> SearchQuery {
	SearchQuery::new().suggest_completion(partial, contexts).window(0, 0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn org(filter: &str) -> Organization {
		Organization { name: filter.to_string(), filter: filter.to_string() }
	}

	#[test]
	fn member_contexts_come_from_their_organizations() {
		let requester =
			Requester::User { organizations: vec![org("o1"), org("o2"), org("o1")] };
		let contexts = suggest_contexts(&requester, &[org("other")]).expect("contexts");

		assert_eq!(contexts, vec!["o1".to_string(), "o2".to_string()]);
	}

	#[test]
	fn anonymous_contexts_span_all_organizations() {
		let contexts =
			suggest_contexts(&Requester::Anonymous, &[org("o1"), org("o2")]).expect("contexts");

		assert_eq!(contexts.len(), 2);
	}

	#[test]
	fn no_organizations_anywhere_is_not_found() {
		let err = suggest_contexts(&Requester::Anonymous, &[]).expect_err("must refuse");
		assert!(matches!(err, ServiceError::NotFound { .. }));

		let memberless = Requester::User { organizations: Vec::new() };
		let contexts = suggest_contexts(&memberless, &[org("o1")]).expect("falls back to all");
		assert_eq!(contexts, vec!["o1".to_string()]);
	}

	#[test]
	fn suggest_query_requests_no_hits() {
		let body = build_suggest_query("int", &["o1".to_string()]).body();

		assert_eq!(body["size"], json!(0));
		assert_eq!(
			body["suggest"]["autocomplete_suggestion"]["completion"]["contexts"]["filter"],
			json!(["o1"])
		);
	}
}
