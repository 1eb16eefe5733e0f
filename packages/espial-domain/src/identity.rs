use serde::{Deserialize, Serialize};

/// A tenant organization. `filter` is the value stamped onto every indexed
/// document belonging to the organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
	pub name: String,
	pub filter: String,
}

/// The identity a request is made under. Constructed per request by the
/// (external) auth layer; never persisted here.
#[derive(Debug, Clone)]
pub enum Requester {
	Anonymous,
	User { organizations: Vec<Organization> },
}

impl Requester {
	/// The organizations this requester is a member of, if any.
	pub fn organizations(&self) -> &[Organization] {
		match self {
			Self::Anonymous => &[],
			Self::User { organizations } => organizations,
		}
	}
}
