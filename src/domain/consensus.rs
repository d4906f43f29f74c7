use crate::domain::model::{ConsensusResult, Rating, Review};

/// Ratings of 4 and up (0-5 scale) count as a recommendation.
pub const RECOMMEND_THRESHOLD: f64 = 4.0;

/// Anything carrying a 0-5 star value.
pub trait Rated {
    fn rating(&self) -> f64;
}

impl Rated for Rating {
    fn rating(&self) -> f64 {
        self.rating
    }
}

impl Rated for Review {
    fn rating(&self) -> f64 {
        self.rating
    }
}

impl Rated for f64 {
    fn rating(&self) -> f64 {
        *self
    }
}

impl<T: Rated + ?Sized> Rated for &T {
    fn rating(&self) -> f64 {
        (**self).rating()
    }
}

/// Reduces ratings to an average on the 0-10 scale plus the share that recommend.
/// An empty slice yields the all-zero result.
pub fn compute_consensus<R: Rated>(ratings: &[R]) -> ConsensusResult {
    if ratings.is_empty() {
        return ConsensusResult::default();
    }

    let (sum, recommending) = ratings.iter().fold((0.0, 0usize), |(sum, rec), r| {
        let value = r.rating();
        let rec = if value >= RECOMMEND_THRESHOLD { rec + 1 } else { rec };
        (sum + value, rec)
    });

    let count = ratings.len();
    let recommend_percent = (recommending as f64 / count as f64 * 100.0).round() as u8;

    ConsensusResult {
        average: sum / count as f64 * 2.0,
        recommend_percent,
        count,
    }
}
