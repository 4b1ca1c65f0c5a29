use serde::{Deserialize, Serialize};

use super::domain::{AnswerSheet, TalentCategory};
use super::questionnaire::Questionnaire;

/// Arithmetic mean of a rating set. An empty set yields 0.0; this never
/// divides by zero and never fails.
pub fn average(ratings: &[u8]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: u32 = ratings.iter().map(|rating| *rating as u32).sum();
    sum as f64 / ratings.len() as f64
}

/// Map the two axis averages onto a talent category.
///
/// The cascade is order-sensitive: the first matching rule wins, so ties on
/// the thresholds resolve by rule position, not by magnitude. Non-finite
/// inputs yield the `NotApplicable` sentinel instead of an error.
pub fn categorize(avg_performance: f64, avg_potential: f64) -> TalentCategory {
    if !avg_performance.is_finite() || !avg_potential.is_finite() {
        return TalentCategory::NotApplicable;
    }

    if avg_performance >= 4.5 && avg_potential >= 4.5 {
        TalentCategory::TopTalent
    } else if avg_performance >= 4.0 && avg_potential >= 3.5 {
        TalentCategory::HighPerformer
    } else if avg_performance >= 3.0 && avg_potential >= 4.0 {
        TalentCategory::GrowingPotential
    } else if avg_performance >= 3.0 && avg_potential >= 3.0 {
        TalentCategory::ReliableContributor
    } else if avg_performance < 3.0 && avg_potential >= 3.0 {
        TalentCategory::TalentInDevelopment
    } else {
        TalentCategory::NeedsImprovement
    }
}

/// Derived score fields persisted alongside the raw answers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub avg_performance: f64,
    pub avg_potential: f64,
    pub category: TalentCategory,
}

/// Aggregate an answer sheet against the resolved questionnaire.
///
/// Only answered questions count toward an axis average; a question absent
/// from the sheet is skipped rather than treated as a zero, so a partially
/// saved draft does not crater the averages.
pub fn score_answers(questionnaire: &Questionnaire, answers: &AnswerSheet) -> ScoreSummary {
    let performance: Vec<u8> = questionnaire
        .performance
        .iter()
        .filter(|question| answers.contains(&question.id))
        .map(|question| answers.rating(&question.id))
        .collect();
    let potential: Vec<u8> = questionnaire
        .potential
        .iter()
        .filter(|question| answers.contains(&question.id))
        .map(|question| answers.rating(&question.id))
        .collect();

    let avg_performance = average(&performance);
    let avg_potential = average(&potential);

    ScoreSummary {
        avg_performance,
        avg_potential,
        category: categorize(avg_performance, avg_potential),
    }
}
