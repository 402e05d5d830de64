//! Plain-text report rendering.
//!
//! Averages come from the accumulators, which yield `None` when empty, and the
//! per-week rates are zero for a non-positive window, so nothing here divides
//! by zero. The whole report is formatted into one string before anything
//! reaches stdout.

use crate::aggregate::{Aggregation, TierAccumulator};
use crate::tier::TierSet;
use std::fmt;

const RULE_WIDTH: usize = 60;

/// Rendered view over a finished aggregation.
pub struct Report<'a> {
    agg: &'a Aggregation,
    tiers: &'a TierSet,
    window_days: i64,
}

impl<'a> Report<'a> {
    pub fn new(agg: &'a Aggregation, tiers: &'a TierSet, window_days: i64) -> Self {
        Self {
            agg,
            tiers,
            window_days,
        }
    }

    fn overall(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let all = &self.agg.overall;
        header(f, &format!("OVERALL METRICS (Last {} Days)", self.window_days))?;
        writeln!(f, "Total PRs merged: {}", all.count)?;
        writeln!(f, "Average time to merge: {:.1} hours", avg(all, TierAccumulator::avg_hours))?;
        writeln!(
            f,
            "Average PR size: {:.0} lines changed",
            avg(all, TierAccumulator::avg_size)
        )?;
        writeln!(f, "Average review cycles: {:.1}", avg(all, TierAccumulator::avg_reviews))?;
        writeln!(f)
    }

    fn by_tier(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        header(f, "METRICS BY TIER")?;
        for tier in self.tiers.display_order() {
            let Some(acc) = self.agg.tier(tier).filter(|acc| acc.count > 0) else {
                continue;
            };
            let hours = avg(acc, TierAccumulator::avg_hours);
            writeln!(f)?;
            writeln!(f, "{}:", self.tiers.name(tier))?;
            writeln!(f, "  PRs merged: {}", acc.count)?;
            writeln!(
                f,
                "  Avg time to merge: {:.1} hours ({:.1} days)",
                hours,
                hours / 24.0
            )?;
            writeln!(f, "  Avg PR size: {:.0} lines", avg(acc, TierAccumulator::avg_size))?;
            writeln!(f, "  Avg review cycles: {:.1}", avg(acc, TierAccumulator::avg_reviews))?;
        }
        Ok(())
    }

    fn velocity(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        header(f, "VELOCITY METRICS")?;
        writeln!(f, "PRs per week: {:.1}", self.prs_per_week())?;
        writeln!(f, "Lines changed per week: {:.0}", self.lines_per_week())
    }

    fn distribution(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        header(f, "TIER DISTRIBUTION")?;
        for tier in self.tiers.display_order() {
            let (Some(acc), Some(pct)) = (self.agg.tier(tier), self.agg.percentage(tier)) else {
                continue;
            };
            writeln!(f, "{}: {} ({:.1}%)", self.tiers.name(tier), acc.count, pct)?;
        }
        Ok(())
    }

    pub fn prs_per_week(&self) -> f64 {
        self.per_week(self.agg.overall.count as f64)
    }

    pub fn lines_per_week(&self) -> f64 {
        self.per_week(self.agg.overall.total_size as f64)
    }

    fn per_week(&self, total: f64) -> f64 {
        if self.window_days <= 0 {
            return 0.0;
        }
        total * 7.0 / self.window_days as f64
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.overall(f)?;
        self.by_tier(f)?;
        self.velocity(f)?;
        self.distribution(f)
    }
}

/// Message printed instead of a report when nothing merged in the window.
pub fn no_data_message(window_days: i64) -> String {
    format!("No merged PRs found in the last {window_days} days.")
}

fn header(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(f, "{rule}")?;
    writeln!(f, "{title}")?;
    writeln!(f, "{rule}")
}

fn avg(acc: &TierAccumulator, metric: fn(&TierAccumulator) -> Option<f64>) -> f64 {
    metric(acc).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::aggregate::tests::merged_pr;
    use crate::review::ReviewState;

    fn render(prs: &[crate::review::ReviewRequest]) -> String {
        let tiers = TierSet::default();
        let agg = aggregate(prs, &tiers).unwrap();
        Report::new(&agg, &tiers, 30).to_string()
    }

    #[test]
    fn no_data_message_names_window() {
        assert_eq!(no_data_message(30), "No merged PRs found in the last 30 days.");
    }

    #[test]
    fn empty_aggregation_renders_zeros() {
        let tiers = TierSet::default();
        let agg = Aggregation::default();
        let text = Report::new(&agg, &tiers, 30).to_string();
        assert!(text.contains("Average time to merge: 0.0 hours\n"));
        assert!(text.contains("PRs per week: 0.0\n"));
        assert!(!text.contains("NaN"));
        assert!(!text.contains('%'));
    }

    #[test]
    fn non_positive_window_has_zero_velocity() {
        let tiers = TierSet::default();
        let agg = aggregate(&[merged_pr(1, Some("SHIP"), 1, 10, &[])], &tiers).unwrap();
        let report = Report::new(&agg, &tiers, 0);
        assert_eq!(report.prs_per_week(), 0.0);
        assert_eq!(report.lines_per_week(), 0.0);
        assert!(!report.to_string().contains("inf"));
    }

    #[test]
    fn ship_example_report() {
        let text = render(&[
            merged_pr(1, Some("SHIP"), 1, 10, &[]),
            merged_pr(2, Some("SHIP"), 2, 20, &[]),
            merged_pr(3, Some("SHIP"), 3, 30, &[]),
        ]);

        assert!(text.contains("OVERALL METRICS (Last 30 Days)"));
        assert!(text.contains("Total PRs merged: 3\n"));
        assert!(text.contains("Average time to merge: 2.0 hours\n"));
        assert!(text.contains("Average PR size: 20 lines changed\n"));
        assert!(text.contains("Average review cycles: 0.0\n"));
        assert!(text.contains("\nSHIP:\n  PRs merged: 3\n"));
        assert!(text.contains("  Avg time to merge: 2.0 hours (0.1 days)\n"));
        assert!(text.contains("  Avg PR size: 20 lines\n"));
        assert!(text.contains("SHIP: 3 (100.0%)\n"));
    }

    #[test]
    fn empty_tiers_are_skipped() {
        let text = render(&[merged_pr(1, Some("RAFT"), 5, 10, &[])]);
        assert!(text.contains("\nRAFT:\n"));
        assert!(!text.contains("SHIP"));
        assert!(!text.contains("CRUISE"));
        assert!(!text.contains("UNTIERED"));
    }

    #[test]
    fn tiers_follow_display_order() {
        let text = render(&[
            merged_pr(1, None, 1, 1, &[]),
            merged_pr(2, Some("ANCHOR"), 1, 1, &[]),
            merged_pr(3, Some("SHIP"), 1, 1, &[]),
        ]);
        let ship = text.find("\nSHIP:").unwrap();
        let anchor = text.find("\nANCHOR:").unwrap();
        let untiered = text.find("\nUNTIERED:").unwrap();
        assert!(ship < anchor && anchor < untiered);

        let dist = text.split("TIER DISTRIBUTION").nth(1).unwrap();
        let lines: Vec<&str> = dist
            .lines()
            .filter(|l| l.contains('%'))
            .collect();
        assert_eq!(
            lines,
            vec!["SHIP: 1 (33.3%)", "ANCHOR: 1 (33.3%)", "UNTIERED: 1 (33.3%)"]
        );
    }

    #[test]
    fn velocity_scales_to_a_week() {
        let prs: Vec<_> = (0..60)
            .map(|n| merged_pr(n, Some("CRUISE"), 2, 15, &[ReviewState::Approved]))
            .collect();
        let tiers = TierSet::default();
        let agg = aggregate(&prs, &tiers).unwrap();
        let report = Report::new(&agg, &tiers, 30);

        assert_eq!(report.prs_per_week(), 14.0);
        assert_eq!(report.lines_per_week(), 210.0);
        let text = report.to_string();
        assert!(text.contains("PRs per week: 14.0\n"));
        assert!(text.contains("Lines changed per week: 210\n"));
        assert!(text.contains("Average review cycles: 1.0\n"));
    }

    #[test]
    fn sections_appear_in_order() {
        let text = render(&[merged_pr(1, Some("SHIP"), 1, 1, &[])]);
        let overall = text.find("OVERALL METRICS").unwrap();
        let by_tier = text.find("METRICS BY TIER").unwrap();
        let velocity = text.find("VELOCITY METRICS").unwrap();
        let dist = text.find("TIER DISTRIBUTION").unwrap();
        assert!(overall < by_tier && by_tier < velocity && velocity < dist);
    }
}
