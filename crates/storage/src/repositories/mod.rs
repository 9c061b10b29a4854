pub mod recommendation_repo;

pub use recommendation_repo::RecommendationRepository;
