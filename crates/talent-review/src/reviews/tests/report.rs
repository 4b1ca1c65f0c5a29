use crate::reviews::domain::{EmployeeId, PeriodId, ReviewStatus, TalentCategory};
use crate::reviews::report::{score_trail, team_summary};

use super::common::{build_service, draft, employee_id, uniform_answers, COMPANY};

#[test]
fn team_summary_counts_statuses_and_categories() {
    let (service, _, _) = build_service();
    service
        .save_evaluation(draft(
            employee_id(),
            false,
            ReviewStatus::Submitted,
            uniform_answers(5),
        ))
        .expect("save");

    let evaluations = service
        .manager_evaluations(COMPANY, &PeriodId("2026-Q1".to_string()))
        .expect("fetch");
    let summary = team_summary(&evaluations);

    assert_eq!(summary.total, 1);
    assert_eq!(summary.submitted, 1);
    assert_eq!(summary.drafts, 0);
    assert_eq!(summary.breakdown.len(), 1);
    assert_eq!(summary.breakdown[0].category, TalentCategory::TopTalent);
    assert_eq!(summary.breakdown[0].count, 1);
    assert_eq!(summary.members[0].full_name, "Denes Farkas");
}

#[test]
fn team_summary_of_no_evaluations_is_empty() {
    let summary = team_summary(&[]);

    assert_eq!(summary.total, 0);
    assert!(summary.breakdown.is_empty());
    assert!(summary.members.is_empty());
}

#[test]
fn score_trail_spans_periods_and_skips_drafts() {
    let (service, _, _) = build_service();
    service
        .save_evaluation(draft(
            employee_id(),
            false,
            ReviewStatus::Submitted,
            uniform_answers(3),
        ))
        .expect("q1 save");

    let mut q2 = draft(
        employee_id(),
        false,
        ReviewStatus::Draft,
        uniform_answers(5),
    );
    q2.period = PeriodId("2026-Q2".to_string());
    service.save_evaluation(q2).expect("q2 save");

    let history = service
        .score_history(COMPANY, &employee_id())
        .expect("history");
    assert_eq!(history.len(), 2);

    let trail = score_trail(&history);
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].period, "2026-Q1");
    assert_eq!(trail[0].avg_performance, 3.0);
}

#[test]
fn score_trail_excludes_self_evaluations() {
    let (service, _, _) = build_service();
    service
        .save_evaluation(draft(
            employee_id(),
            true,
            ReviewStatus::Submitted,
            uniform_answers(5),
        ))
        .expect("self save");

    let history = service
        .score_history(COMPANY, &EmployeeId("1001".to_string()))
        .expect("history");
    assert!(history.is_empty());
}
