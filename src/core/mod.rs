pub mod engine;
pub mod export;

pub use crate::domain::model::{ConsensusResult, Product, Rating, ScoredProduct};
pub use crate::domain::ports::{ProductSource, RatingRepository, Storage};
pub use crate::utils::error::Result;
