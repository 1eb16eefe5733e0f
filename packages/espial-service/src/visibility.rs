//! Organization-scoped visibility. Restricts results to documents whose
//! indexed `filter` tag matches an organization the requester may see.

use espial_domain::{Organization, Requester};
use espial_engine::{SearchQuery, clause};
use serde_json::Value;

/// The OR-group of organization match clauses for a requester.
///
/// A member sees their own organizations; an anonymous visitor sees the union
/// of all tenant-scoped content. When neither applies — a member of zero
/// organizations, or an anonymous visitor on a system with none — the list is
/// empty and the query stays unrestricted. That degradation to "everything
/// visible" is deliberate policy, not an oversight.
pub fn visibility_clauses(requester: &Requester, all_orgs: &[Organization]) -> Vec<Value> {
	let orgs = match requester {
		Requester::User { organizations } if !organizations.is_empty() => organizations.as_slice(),
		Requester::Anonymous if !all_orgs.is_empty() => all_orgs,
		_ => return Vec::new(),
	};

	orgs.iter().map(|org| clause::match_field("filter", &org.filter)).collect()
}

/// ANDs the visibility OR-group into the query, requiring at least one
/// organization clause to match.
pub fn apply_visibility(
	query: SearchQuery,
	requester: &Requester,
	all_orgs: &[Organization],
) -> SearchQuery {
	query.should_any(visibility_clauses(requester, all_orgs))
}
