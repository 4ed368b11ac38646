pub mod models;

pub use models::create_extractor;
pub use rn_core::KeywordExtractor;

pub mod prelude {
    pub use super::models::{create_extractor, ChatExtractor, DummyExtractor, NgramExtractor};
    pub use rn_core::{KeywordExtractor, Result, Error};
}
