use crate::reviews::domain::{AnswerSheet, TalentCategory};
use crate::reviews::questionnaire::standard_questionnaire;
use crate::reviews::scoring::{average, categorize, score_answers};

use super::common::uniform_answers;

#[test]
fn average_of_empty_set_is_zero() {
    assert_eq!(average(&[]), 0.0);
}

#[test]
fn average_is_arithmetic_mean() {
    assert_eq!(average(&[3, 4, 5]), 4.0);
    assert_eq!(average(&[1, 2]), 1.5);
}

#[test]
fn categorize_follows_the_nine_box_cascade() {
    assert_eq!(categorize(4.5, 4.5), TalentCategory::TopTalent);
    assert_eq!(categorize(5.0, 4.6), TalentCategory::TopTalent);
    assert_eq!(categorize(4.0, 3.5), TalentCategory::HighPerformer);
    assert_eq!(categorize(3.0, 4.0), TalentCategory::GrowingPotential);
    assert_eq!(categorize(3.0, 3.0), TalentCategory::ReliableContributor);
    assert_eq!(categorize(2.9, 3.0), TalentCategory::TalentInDevelopment);
    assert_eq!(categorize(2.0, 2.0), TalentCategory::NeedsImprovement);
}

#[test]
fn categorize_resolves_boundary_ties_by_rule_order() {
    // 4.5 performance with 4.4 potential misses Top Talent but clears the
    // High Performer thresholds.
    assert_eq!(categorize(4.5, 4.4), TalentCategory::HighPerformer);
    // High potential alone is not enough for the upper boxes.
    assert_eq!(categorize(2.5, 5.0), TalentCategory::TalentInDevelopment);
}

#[test]
fn categorize_yields_sentinel_for_non_numeric_input() {
    assert_eq!(categorize(f64::NAN, 4.0), TalentCategory::NotApplicable);
    assert_eq!(categorize(4.0, f64::INFINITY), TalentCategory::NotApplicable);
}

#[test]
fn category_labels_match_reporting_strings() {
    assert_eq!(TalentCategory::TopTalent.label(), "Top Talent");
    assert_eq!(TalentCategory::NotApplicable.label(), "N/A");
    assert_eq!(
        TalentCategory::TalentInDevelopment.label(),
        "Talent in Development"
    );
}

#[test]
fn score_answers_averages_both_axes() {
    let questionnaire = standard_questionnaire();
    let summary = score_answers(&questionnaire, &uniform_answers(4));

    assert_eq!(summary.avg_performance, 4.0);
    assert_eq!(summary.avg_potential, 4.0);
    assert_eq!(summary.category, TalentCategory::HighPerformer);
}

#[test]
fn score_answers_skips_unanswered_questions() {
    let questionnaire = standard_questionnaire();
    let answers: AnswerSheet = [("P1".to_string(), 5), ("P2".to_string(), 3)]
        .into_iter()
        .collect();

    let summary = score_answers(&questionnaire, &answers);

    // Two answered performance questions average to 4; the untouched
    // potential axis stays at zero instead of dragging in phantom zeros.
    assert_eq!(summary.avg_performance, 4.0);
    assert_eq!(summary.avg_potential, 0.0);
    assert_eq!(summary.category, TalentCategory::NeedsImprovement);
}

#[test]
fn score_answers_on_empty_sheet_bottoms_out() {
    let questionnaire = standard_questionnaire();
    let summary = score_answers(&questionnaire, &AnswerSheet::new());

    assert_eq!(summary.avg_performance, 0.0);
    assert_eq!(summary.avg_potential, 0.0);
    assert_eq!(summary.category, TalentCategory::NeedsImprovement);
}
