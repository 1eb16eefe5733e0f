pub mod fields;
pub mod identity;
pub mod page;

pub use fields::{FilterField, FilterKind, SearchField, SortOption, SpotlightEntry, keyword_field};
pub use identity::{Organization, Requester};
pub use page::page_start;
