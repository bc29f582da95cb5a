mod recommendation;

pub use recommendation::{parse_relevance_date, Recommendation, RecommendationType};
