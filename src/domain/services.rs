use crate::domain::consensus::{compute_consensus, Rated};
use crate::domain::model::{Product, ScoredProduct, UserRating};
use crate::domain::tier::{ScorePolicy, Tier, MAX_SCORE};
use crate::utils::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;

/// Case-insensitive substring match on title, category or SKU.
/// A blank query matches everything; otherwise surrounding whitespace is part of the needle.
pub fn search<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    if query.trim().is_empty() {
        return products.iter().collect();
    }
    let needle = query.to_lowercase();

    products
        .iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&needle)
                || p.category.to_lowercase().contains(&needle)
                || p
                    .sku
                    .as_deref()
                    .is_some_and(|sku| sku.to_lowercase().contains(&needle))
        })
        .collect()
}

pub fn score_product<R: Rated>(
    product: Product,
    ratings: &[R],
    policy: ScorePolicy,
) -> Result<ScoredProduct> {
    let consensus = compute_consensus(ratings);
    let tier = policy.classify(consensus.average)?;
    Ok(ScoredProduct {
        product,
        consensus,
        tier,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierGroup {
    pub tier: Tier,
    pub color: &'static str,
    pub range: &'static str,
    pub products: Vec<ScoredProduct>,
}

impl TierGroup {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierList {
    pub groups: Vec<TierGroup>,
}

impl TierList {
    /// Groups that have at least one product, best tier first.
    pub fn non_empty(&self) -> impl Iterator<Item = &TierGroup> {
        self.groups.iter().filter(|g| !g.is_empty())
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.products.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn group(&self, tier: Tier) -> Option<&TierGroup> {
        self.groups.iter().find(|g| g.tier == tier)
    }
}

/// Buckets products into all eight tiers, S+ first. Within a tier, higher
/// averages come first; the incoming order breaks ties.
pub fn group_by_tier(scored: Vec<ScoredProduct>) -> TierList {
    let mut groups: Vec<TierGroup> = Tier::ALL
        .iter()
        .map(|&tier| TierGroup {
            tier,
            color: tier.color(),
            range: tier.range_label(),
            products: Vec::new(),
        })
        .collect();

    for item in scored {
        // Tier::ALL is in declaration order, so the discriminant is the index.
        groups[item.tier as usize].products.push(item);
    }

    for group in &mut groups {
        group.products.sort_by(|a, b| {
            b.consensus
                .average
                .total_cmp(&a.consensus.average)
        });
    }

    TierList { groups }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileEntry {
    pub rating: UserRating,
    pub tier: Tier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub products_rated: usize,
    pub reviews_written: usize,
    pub average_score: f64,
    pub distribution: BTreeMap<Tier, usize>,
    /// Highest score first.
    pub entries: Vec<ProfileEntry>,
}

/// Tiers are always derived from the stored score with the canonical table.
/// `Reject` refuses any score outside 0-10 (or NaN); `Clamp` pins it into range
/// before it counts toward the mean.
pub fn profile_summary(ratings: Vec<UserRating>, policy: ScorePolicy) -> Result<ProfileSummary> {
    let products_rated = ratings.len();
    let reviews_written = ratings
        .iter()
        .filter(|r| r.review.as_deref().is_some_and(|text| !text.trim().is_empty()))
        .count();

    let mut total = 0.0;
    let mut entries = Vec::with_capacity(products_rated);
    for rating in ratings {
        let tier = policy.classify(rating.score)?;
        total += clamp_score(rating.score);
        entries.push(ProfileEntry { rating, tier });
    }
    entries.sort_by(|a, b| b.rating.score.total_cmp(&a.rating.score));

    let average_score = if products_rated == 0 {
        0.0
    } else {
        total / products_rated as f64
    };

    let mut distribution = BTreeMap::new();
    for entry in &entries {
        *distribution.entry(entry.tier).or_insert(0) += 1;
    }

    Ok(ProfileSummary {
        products_rated,
        reviews_written,
        average_score,
        distribution,
        entries,
    })
}

/// NaN counts as 0.
fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, MAX_SCORE)
    }
}
