//! Deterministic scoring rubric
//!
//! Maps the four 0-10 dimension scores onto a category. Total /40:
//!   0-14  -> BACKLOG
//!   15-22 -> CONSIDERABLE
//!   23-30 -> PROMISING
//!   31-40 -> LUCRATIVE
//!
//! Pure and total: no I/O, never fails. Unlike the validator (the strict
//! gate before acceptance), the rubric tolerates noisy input: missing
//! dimensions count as 0.

use crate::blueprint::{IdeaCandidate, ScoreSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Idea category, totally ordered by ascending total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Backlog,
    Considerable,
    Promising,
    Lucrative,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Backlog,
        Category::Considerable,
        Category::Promising,
        Category::Lucrative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Backlog => "BACKLOG",
            Category::Considerable => "CONSIDERABLE",
            Category::Promising => "PROMISING",
            Category::Lucrative => "LUCRATIVE",
        }
    }

    /// Parse a stored category string; unknown values map to Backlog
    /// rather than failing (reads tolerate noise, writes are canonical).
    pub fn from_str_lossy(s: &str) -> Category {
        match s {
            "CONSIDERABLE" => Category::Considerable,
            "PROMISING" => Category::Promising,
            "LUCRATIVE" => Category::Lucrative,
            _ => Category::Backlog,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusive upper bound of each category band. Fixed constants, not
/// configurable at runtime.
const CATEGORY_THRESHOLDS: [(i64, Category); 4] = [
    (14, Category::Backlog),
    (22, Category::Considerable),
    (30, Category::Promising),
    (40, Category::Lucrative),
];

/// Total score for a score set, clamped to [0, 40].
///
/// The four dimensions are summed first and the sum is truncated toward
/// zero, rather than truncating each term. For fractional inputs the two
/// orders differ; the sum-then-truncate choice is deliberate and covered
/// by tests. NaN truncates to 0.
pub fn total_score(scores: &ScoreSet) -> i64 {
    let sum = scores.demand_urgency
        + scores.pricing_power
        + scores.distribution_ease
        + scores.speed_to_mvp;
    (sum as i64).clamp(0, 40)
}

/// Map a score set to its category. Pure, total, never fails.
pub fn category_for(scores: &ScoreSet) -> Category {
    let total = total_score(scores);
    for (threshold, category) in CATEGORY_THRESHOLDS {
        if total <= threshold {
            return category;
        }
    }
    Category::Lucrative
}

/// Attach `category` and `total_score` to every idea in a batch. The
/// attached total is the same clamped value used to select the category.
pub fn apply_rubric(ideas: &mut [IdeaCandidate]) {
    for idea in ideas.iter_mut() {
        idea.category = Some(category_for(&idea.scores));
        idea.total_score = Some(total_score(&idea.scores));
    }
}

/// Per-category idea counts for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub backlog: u32,
    pub considerable: u32,
    pub promising: u32,
    pub lucrative: u32,
}

impl CategoryCounts {
    /// Tally categorized ideas. Ideas the rubric has not touched yet are
    /// categorized on the fly.
    pub fn tally(ideas: &[IdeaCandidate]) -> Self {
        let mut counts = Self::default();
        for idea in ideas {
            let category = idea.category.unwrap_or_else(|| category_for(&idea.scores));
            match category {
                Category::Backlog => counts.backlog += 1,
                Category::Considerable => counts.considerable += 1,
                Category::Promising => counts.promising += 1,
                Category::Lucrative => counts.lucrative += 1,
            }
        }
        counts
    }

    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Backlog => self.backlog,
            Category::Considerable => self.considerable,
            Category::Promising => self.promising,
            Category::Lucrative => self.lucrative,
        }
    }

    pub fn total(&self) -> u32 {
        self.backlog + self.considerable + self.promising + self.lucrative
    }
}
