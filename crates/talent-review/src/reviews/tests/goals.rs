use crate::reviews::goals::{
    goal_weight_warning, normalize_progress, weight_warning, weighted_progress, GoalKpi,
    GoalStatus, KpiDraft,
};
use crate::reviews::repository::RepositoryError;
use crate::reviews::service::ReviewServiceError;

use super::common::{build_service, employee_id, goal_for, period_id, COMPANY};

fn kpi(weight: u32, progress: f64) -> GoalKpi {
    GoalKpi {
        goal_id: 1,
        description: "indicator".to_string(),
        weight,
        progress,
    }
}

#[test]
fn normalize_progress_reads_large_values_as_percentages() {
    assert_eq!(normalize_progress(72.0), 0.72);
    assert_eq!(normalize_progress(0.5), 0.5);
    assert_eq!(normalize_progress(1.0), 1.0);
}

#[test]
fn normalize_progress_keeps_overshoot_visible_and_defuses_bad_input() {
    // 250 reads as 250%: an oversummed roll-up must stay visible on display.
    assert_eq!(normalize_progress(250.0), 2.5);
    assert_eq!(normalize_progress(f64::NAN), 0.0);
    assert_eq!(normalize_progress(f64::INFINITY), 0.0);
}

#[test]
fn weighted_progress_rolls_up_by_weight() {
    // 60% weight at 50% done plus 40% at 100% done lands at 70%.
    let kpis = vec![kpi(60, 50.0), kpi(40, 100.0)];
    assert_eq!(weighted_progress(&kpis), 70.0);
    assert!(weighted_progress(&[]).abs() < f64::EPSILON);
}

#[test]
fn weighted_progress_is_not_clamped_when_weights_oversum() {
    let kpis = vec![kpi(100, 100.0), kpi(50, 100.0)];
    assert_eq!(weighted_progress(&kpis), 150.0);
}

#[test]
fn weight_warning_fires_only_off_balance() {
    assert!(weight_warning(100).is_none());
    let message = weight_warning(80).expect("warning");
    assert!(message.contains("80%"));
}

#[test]
fn save_kpis_drops_blank_rows_and_stores_percents_as_submitted() {
    let (service, _, _) = build_service();
    let goal = service.create_goal(goal_for(employee_id())).expect("goal");

    let outcome = service
        .save_goal_kpis(
            COMPANY,
            goal.id,
            vec![
                KpiDraft {
                    description: "Invoices migrated".to_string(),
                    weight: 60,
                    progress: 50.0,
                },
                KpiDraft {
                    description: "   ".to_string(),
                    weight: 20,
                    progress: 100.0,
                },
                KpiDraft {
                    description: "Legacy jobs retired".to_string(),
                    weight: 40,
                    progress: 25.0,
                },
            ],
        )
        .expect("save");

    // The blank filler row is gone; 60 * 50 / 100 + 40 * 25 / 100 = 40.
    assert_eq!(outcome.progress, 40.0);
    assert_eq!(outcome.weight_total, 100);
    assert!(outcome.warning.is_none());

    let kpis = service.kpis_for(COMPANY, goal.id).expect("kpis");
    assert_eq!(kpis.len(), 2);
    assert_eq!(kpis[0].progress, 50.0);
    assert_eq!(kpis[1].progress, 25.0);
}

#[test]
fn save_kpis_zeroes_non_finite_progress() {
    let (service, _, _) = build_service();
    let goal = service.create_goal(goal_for(employee_id())).expect("goal");

    let outcome = service
        .save_goal_kpis(
            COMPANY,
            goal.id,
            vec![KpiDraft {
                description: "Corrupt import row".to_string(),
                weight: 100,
                progress: f64::NAN,
            }],
        )
        .expect("save");

    assert_eq!(outcome.progress, 0.0);
    let kpis = service.kpis_for(COMPANY, goal.id).expect("kpis");
    assert_eq!(kpis[0].progress, 0.0);
}

#[test]
fn save_kpis_warns_on_imbalanced_weights_but_still_persists() {
    let (service, _, _) = build_service();
    let goal = service.create_goal(goal_for(employee_id())).expect("goal");

    let outcome = service
        .save_goal_kpis(
            COMPANY,
            goal.id,
            vec![KpiDraft {
                description: "Only indicator".to_string(),
                weight: 60,
                progress: 100.0,
            }],
        )
        .expect("save");

    assert_eq!(outcome.weight_total, 60);
    assert!(outcome.warning.as_deref().unwrap().contains("60%"));

    let goals = service
        .goals_for(COMPANY, &period_id(), &employee_id())
        .expect("goals");
    assert_eq!(goals[0].progress, 60.0);
}

#[test]
fn save_kpis_replaces_the_previous_set() {
    let (service, _, _) = build_service();
    let goal = service.create_goal(goal_for(employee_id())).expect("goal");

    service
        .save_goal_kpis(
            COMPANY,
            goal.id,
            vec![
                KpiDraft {
                    description: "First".to_string(),
                    weight: 50,
                    progress: 100.0,
                },
                KpiDraft {
                    description: "Second".to_string(),
                    weight: 50,
                    progress: 100.0,
                },
            ],
        )
        .expect("first save");
    let outcome = service
        .save_goal_kpis(
            COMPANY,
            goal.id,
            vec![KpiDraft {
                description: "Replacement".to_string(),
                weight: 100,
                progress: 0.0,
            }],
        )
        .expect("second save");

    assert_eq!(outcome.progress, 0.0);
    let kpis = service.kpis_for(COMPANY, goal.id).expect("kpis");
    assert_eq!(kpis.len(), 1);
    assert_eq!(kpis[0].description, "Replacement");
}

#[test]
fn clearing_all_kpis_is_allowed_and_not_a_warning() {
    let (service, _, _) = build_service();
    let goal = service.create_goal(goal_for(employee_id())).expect("goal");

    let outcome = service
        .save_goal_kpis(COMPANY, goal.id, Vec::new())
        .expect("save");

    assert_eq!(outcome.progress, 0.0);
    assert!(outcome.warning.is_none());
}

#[test]
fn goal_weights_across_a_period_get_the_same_advisory_check() {
    let (service, _, _) = build_service();
    service.create_goal(goal_for(employee_id())).expect("first");
    let mut second = goal_for(employee_id());
    second.title = "Cut incident response time".to_string();
    second.weight = 40;
    service.create_goal(second).expect("second");

    let warning = service
        .goal_weight_warning(COMPANY, &period_id(), &employee_id())
        .expect("check")
        .expect("imbalanced");
    assert!(warning.contains("80%"));

    // No goals at all is not worth warning about.
    assert!(goal_weight_warning(&[]).is_none());
}

#[test]
fn updating_a_goal_rewrites_its_fields() {
    let (service, _, _) = build_service();
    let goal = service.create_goal(goal_for(employee_id())).expect("goal");

    let mut revised = goal.clone();
    revised.status = GoalStatus::AtRisk;
    revised.weight = 30;
    service.update_goal(revised).expect("update");

    let goals = service
        .goals_for(COMPANY, &period_id(), &employee_id())
        .expect("goals");
    assert_eq!(goals[0].status, GoalStatus::AtRisk);
    assert_eq!(goals[0].weight, 30);
}

#[test]
fn updating_an_unknown_goal_is_not_found() {
    let (service, _, _) = build_service();

    let mut goal = goal_for(employee_id());
    goal.id = 404;

    assert!(matches!(
        service.update_goal(goal),
        Err(ReviewServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn deleting_a_goal_removes_its_kpis() {
    let (service, _, _) = build_service();
    let goal = service.create_goal(goal_for(employee_id())).expect("goal");
    service
        .save_goal_kpis(
            COMPANY,
            goal.id,
            vec![KpiDraft {
                description: "Indicator".to_string(),
                weight: 100,
                progress: 50.0,
            }],
        )
        .expect("save");

    service.delete_goal(COMPANY, goal.id).expect("delete");

    assert!(service
        .goals_for(COMPANY, &period_id(), &employee_id())
        .expect("goals")
        .is_empty());
    assert!(service.kpis_for(COMPANY, goal.id).expect("kpis").is_empty());
}

#[test]
fn saving_kpis_for_a_missing_goal_is_not_found() {
    let (service, _, _) = build_service();

    let result = service.save_goal_kpis(COMPANY, 404, Vec::new());

    assert!(matches!(
        result,
        Err(ReviewServiceError::Repository(RepositoryError::NotFound))
    ));
}
