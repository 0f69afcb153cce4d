pub mod condition;
pub mod fast_lowercase;
pub mod parser;
mod regex_cache;

pub use condition::QueryCondition;
pub use fast_lowercase::FastLowercase;
pub use parser::parse_query;
