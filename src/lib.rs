pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{
    InMemoryRatingRepository, JsonRatingRepository, LocalStorage, RestClient, SeedCatalog,
};
pub use config::AppConfig;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use core::engine::TierWorld;
pub use domain::consensus::{compute_consensus, Rated};
pub use domain::model::{ConsensusResult, NewRating, Product, Rating, Review, ScoredProduct, UserRating};
pub use domain::tier::{classify_tier, tier_color, try_classify_tier, ScorePolicy, Tier};
pub use utils::error::{Result, StierError};
