use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{EmployeeId, Evaluation, ReviewStatus, TalentCategory};

/// One row of the manager dashboard: where a direct report stands in the
/// current period.
#[derive(Debug, Clone, Serialize)]
pub struct TeamMemberRow {
    pub employee_id: EmployeeId,
    pub full_name: String,
    pub job_title: String,
    pub status: &'static str,
    pub avg_performance: f64,
    pub avg_potential: f64,
    pub category_label: &'static str,
}

/// Count of manager evaluations landing in one talent category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub category: TalentCategory,
    pub category_label: &'static str,
    pub count: usize,
}

/// Period roll-up over a set of manager evaluations.
#[derive(Debug, Clone, Serialize)]
pub struct TeamSummary {
    pub total: usize,
    pub submitted: usize,
    pub drafts: usize,
    pub breakdown: Vec<CategoryCount>,
    pub members: Vec<TeamMemberRow>,
}

/// Build the dashboard summary from manager evaluations of one period.
pub fn team_summary(evaluations: &[Evaluation]) -> TeamSummary {
    let mut counts: BTreeMap<&'static str, (TalentCategory, usize)> = BTreeMap::new();
    let mut submitted = 0;
    let mut drafts = 0;

    let members = evaluations
        .iter()
        .map(|evaluation| {
            match evaluation.status {
                ReviewStatus::Submitted => submitted += 1,
                ReviewStatus::Draft => drafts += 1,
                _ => {}
            }
            counts
                .entry(evaluation.category.label())
                .or_insert((evaluation.category, 0))
                .1 += 1;

            TeamMemberRow {
                employee_id: evaluation.key.employee_id.clone(),
                full_name: evaluation.snapshot.full_name.clone(),
                job_title: evaluation.snapshot.job_title.clone(),
                status: evaluation.status.label(),
                avg_performance: evaluation.avg_performance,
                avg_potential: evaluation.avg_potential,
                category_label: evaluation.category.label(),
            }
        })
        .collect();

    TeamSummary {
        total: evaluations.len(),
        submitted,
        drafts,
        breakdown: counts
            .into_values()
            .map(|(category, count)| CategoryCount {
                category,
                category_label: category.label(),
                count,
            })
            .collect(),
        members,
    }
}

/// One point on an employee's score trail across periods.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreTrailPoint {
    pub period: String,
    pub avg_performance: f64,
    pub avg_potential: f64,
    pub category_label: &'static str,
    pub recorded_on: NaiveDate,
}

/// Score trail from a manager-evaluation history, oldest first. Only
/// submitted rows count; an in-progress draft is not history yet.
pub fn score_trail(history: &[Evaluation]) -> Vec<ScoreTrailPoint> {
    history
        .iter()
        .filter(|evaluation| evaluation.status.is_locked())
        .map(|evaluation| ScoreTrailPoint {
            period: evaluation.key.period.0.clone(),
            avg_performance: evaluation.avg_performance,
            avg_potential: evaluation.avg_potential,
            category_label: evaluation.category.label(),
            recorded_on: evaluation.last_modified,
        })
        .collect()
}
