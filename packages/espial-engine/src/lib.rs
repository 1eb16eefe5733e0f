mod client;
mod error;
mod query;
mod response;

pub use client::EngineClient;
pub use error::{Error, Result};
pub use query::{SearchQuery, clause};
pub use response::{RawDocument, RawHit, RawHits, RawSearchResponse, RawTotal};
