pub mod fetcher;
pub mod parser;
pub mod search;

pub use crate::domain::model::{FeedRecord, SearchCriteria, SearchResult};
pub use crate::domain::ports::FeedSource;
pub use crate::utils::error::Result;
