//! Tier classification from pull request labels.

use crate::config::TierConfig;
use crate::review::Label;

/// The tier a pull request is reported under.
///
/// `Named` indexes into the [`TierSet`] names. The derived ordering is the
/// display order: named tiers as declared, then `Untiered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Named(usize),
    Untiered,
}

/// The closed set of tier names plus the fallback name.
#[derive(Debug, Clone)]
pub struct TierSet {
    names: Vec<String>,
    fallback: String,
}

impl TierSet {
    /// Empty names and names equal to the fallback are dropped.
    pub fn new(names: Vec<String>, fallback: impl Into<String>) -> Self {
        let fallback = fallback.into();
        let names = names
            .into_iter()
            .filter(|name| {
                let keep = !name.is_empty() && *name != fallback;
                if !keep {
                    tracing::warn!(tier = %name, %fallback, "ignoring tier name");
                }
                keep
            })
            .collect();
        Self { names, fallback }
    }

    pub fn from_config(config: &TierConfig) -> Self {
        Self::new(config.names.clone(), config.fallback.clone())
    }

    /// First label (in list order) naming a known tier wins.
    pub fn classify(&self, labels: &[Label]) -> Tier {
        labels
            .iter()
            .find_map(|label| self.names.iter().position(|n| *n == label.name))
            .map(Tier::Named)
            .unwrap_or(Tier::Untiered)
    }

    pub fn name(&self, tier: Tier) -> &str {
        match tier {
            Tier::Named(idx) => self.names.get(idx).map_or(&self.fallback, |n| n),
            Tier::Untiered => &self.fallback,
        }
    }

    /// Every tier in display order.
    pub fn display_order(&self) -> impl Iterator<Item = Tier> + '_ {
        (0..self.names.len())
            .map(Tier::Named)
            .chain(std::iter::once(Tier::Untiered))
    }
}

impl Default for TierSet {
    fn default() -> Self {
        Self::from_config(&TierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<Label> {
        names
            .iter()
            .map(|n| Label {
                name: n.to_string(),
            })
            .collect()
    }

    #[test]
    fn no_labels_is_untiered() {
        let tiers = TierSet::default();
        assert_eq!(tiers.classify(&[]), Tier::Untiered);
        assert_eq!(tiers.name(Tier::Untiered), "UNTIERED");
    }

    #[test]
    fn unrecognized_labels_are_untiered() {
        let tiers = TierSet::default();
        assert_eq!(tiers.classify(&labels(&["bug", "ship"])), Tier::Untiered);
    }

    #[test]
    fn matches_tier_among_other_labels() {
        let tiers = TierSet::default();
        let tier = tiers.classify(&labels(&["bug", "RAFT", "docs"]));
        assert_eq!(tiers.name(tier), "RAFT");
    }

    #[test]
    fn first_tier_label_in_list_order_wins() {
        let tiers = TierSet::default();
        let tier = tiers.classify(&labels(&["ANCHOR", "SHIP"]));
        assert_eq!(tiers.name(tier), "ANCHOR");
        let tier = tiers.classify(&labels(&["SHIP", "ANCHOR"]));
        assert_eq!(tiers.name(tier), "SHIP");
    }

    #[test]
    fn empty_and_fallback_names_are_dropped() {
        let tiers = TierSet::new(
            vec!["".into(), "P0".into(), "OTHER".into(), "P1".into()],
            "OTHER",
        );
        let names: Vec<&str> = tiers.display_order().map(|t| tiers.name(t)).collect();
        assert_eq!(names, vec!["P0", "P1", "OTHER"]);
        assert_eq!(tiers.classify(&labels(&["", "OTHER"])), Tier::Untiered);
        assert_eq!(tiers.name(tiers.classify(&labels(&["", "P1"]))), "P1");
    }

    #[test]
    fn display_order_lists_fallback_last() {
        let tiers = TierSet::default();
        let names: Vec<&str> = tiers.display_order().map(|t| tiers.name(t)).collect();
        assert_eq!(names, vec!["SHIP", "CRUISE", "RAFT", "ANCHOR", "UNTIERED"]);
    }

    #[test]
    fn ordering_matches_display_order() {
        let mut tiers = vec![Tier::Untiered, Tier::Named(2), Tier::Named(0)];
        tiers.sort();
        assert_eq!(tiers, vec![Tier::Named(0), Tier::Named(2), Tier::Untiered]);
    }
}
