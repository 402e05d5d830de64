//! Running totals, overall and per tier.

use crate::review::ReviewRequest;
use crate::tier::{Tier, TierSet};
use std::collections::BTreeMap;

/// Sums for one group of pull requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TierAccumulator {
    pub count: usize,
    pub total_hours: f64,
    pub total_size: u64,
    pub total_reviews: u64,
}

impl TierAccumulator {
    pub fn add(&mut self, hours: f64, size: u64, reviews: u32) {
        self.count += 1;
        self.total_hours += hours;
        self.total_size += size;
        self.total_reviews += u64::from(reviews);
    }

    /// Averages are `None` for an empty accumulator.
    pub fn avg_hours(&self) -> Option<f64> {
        self.mean(self.total_hours)
    }

    pub fn avg_size(&self) -> Option<f64> {
        self.mean(self.total_size as f64)
    }

    pub fn avg_reviews(&self) -> Option<f64> {
        self.mean(self.total_reviews as f64)
    }

    fn mean(&self, total: f64) -> Option<f64> {
        (self.count > 0).then(|| total / self.count as f64)
    }
}

/// Overall totals plus one accumulator per tier that actually occurred.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub overall: TierAccumulator,
    /// Keyed by tier; iteration follows display order.
    pub by_tier: BTreeMap<Tier, TierAccumulator>,
}

impl Aggregation {
    pub fn tier(&self, tier: Tier) -> Option<&TierAccumulator> {
        self.by_tier.get(&tier)
    }

    /// Share of all PRs that fell into `tier`, as a percentage.
    pub fn percentage(&self, tier: Tier) -> Option<f64> {
        let acc = self.tier(tier)?;
        (self.overall.count > 0).then(|| acc.count as f64 / self.overall.count as f64 * 100.0)
    }
}

/// Fold every request into the overall and per-tier totals.
pub fn aggregate(
    requests: &[ReviewRequest],
    tiers: &TierSet,
) -> Result<Aggregation, AggregateError> {
    let mut agg = Aggregation::default();

    for req in requests {
        let hours = req
            .time_to_merge_hours()
            .ok_or(AggregateError::MissingMergeTime { number: req.number })?;
        let size = req.size();
        let reviews = req.review_cycles();
        let tier = tiers.classify(&req.labels);

        agg.overall.add(hours, size, reviews);
        agg.by_tier.entry(tier).or_default().add(hours, size, reviews);
    }

    tracing::debug!(
        total = agg.overall.count,
        tiers = agg.by_tier.len(),
        "aggregated review metrics"
    );
    Ok(agg)
}

/// Errors from aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// A PR without `mergedAt` reached the aggregator.
    MissingMergeTime { number: u64 },
}

impl std::fmt::Display for AggregateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateError::MissingMergeTime { number } => {
                write!(f, "PR #{number} has no merge timestamp")
            }
        }
    }
}

impl std::error::Error for AggregateError {}
