//! Badge tiers earned from activity counts.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    QuestionCount,
    AnswerCount,
    QuestionUpvotes,
    AnswerUpvotes,
    TotalViews,
}

/// Thresholds of one category, lowest tier first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub bronze: u64,
    pub silver: u64,
    pub gold: u64,
}

impl BadgeCategory {
    pub fn thresholds(&self) -> Thresholds {
        match self {
            BadgeCategory::TotalViews => Thresholds {
                bronze: 1_000,
                silver: 10_000,
                gold: 100_000,
            },
            _ => Thresholds {
                bronze: 10,
                silver: 50,
                gold: 100,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BadgeCounts {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

/// Counts, over all categories, each threshold met or exceeded.
pub fn assign(criteria: &[(BadgeCategory, u64)]) -> BadgeCounts {
    criteria
        .iter()
        .fold(BadgeCounts::default(), |mut acc, (category, count)| {
            let t = category.thresholds();

            acc.bronze += (*count >= t.bronze) as u32;
            acc.silver += (*count >= t.silver) as u32;
            acc.gold += (*count >= t.gold) as u32;
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_sum_across_categories() {
        let counts = assign(&[
            (BadgeCategory::QuestionCount, 60),
            (BadgeCategory::TotalViews, 1_500),
        ]);

        assert_eq!(counts, BadgeCounts {
            gold: 0,
            silver: 1,
            bronze: 2,
        });
    }

    #[test]
    fn exact_threshold_counts() {
        let counts = assign(&[
            (BadgeCategory::AnswerUpvotes, 100),
            (BadgeCategory::QuestionUpvotes, 9),
        ]);

        assert_eq!(counts, BadgeCounts {
            gold: 1,
            silver: 1,
            bronze: 1,
        });
    }
}
