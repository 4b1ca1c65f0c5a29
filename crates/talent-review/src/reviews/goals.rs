use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{CompanyId, EmployeeId, PeriodId};

/// Delivery state of a goal, set by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    OnTrack,
    AtRisk,
    Completed,
}

impl GoalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            GoalStatus::OnTrack => "on track",
            GoalStatus::AtRisk => "at risk",
            GoalStatus::Completed => "completed",
        }
    }
}

/// A period-scoped goal assigned by a manager to an employee. Progress is
/// derived from the attached KPIs, never edited directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub period: PeriodId,
    pub employee_id: EmployeeId,
    pub manager_id: EmployeeId,
    pub title: String,
    pub description: String,
    /// Weight of this goal within the period, in percent.
    pub weight: u32,
    /// Roll-up of the KPI progresses, in percent. Stored as computed:
    /// oversummed KPI weights push it past 100.
    pub progress: f64,
    pub status: GoalStatus,
    pub deadline: Option<NaiveDate>,
    pub company_id: CompanyId,
}

/// One measurable indicator under a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalKpi {
    pub goal_id: i64,
    pub description: String,
    /// Weight of this KPI within its goal, in percent.
    pub weight: u32,
    /// Completion of this KPI, in percent, stored as submitted.
    pub progress: f64,
}

/// Incoming KPI row before cleanup. Blank descriptions are dropped on save;
/// a non-finite progress collapses to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiDraft {
    pub description: String,
    pub weight: u32,
    pub progress: f64,
}

/// Display-boundary normalization of a progress value into a 0..=1 fraction.
///
/// Stored progress comes from call sites writing in both units, so a value
/// above 1.0 is read as a percentage (72 means 72%) and divided by 100;
/// anything else passes through unchanged, leaving an oversummed roll-up
/// visible as more than 100%. Non-finite input collapses to 0. Storage never
/// applies this; it belongs in rendering and export paths only.
pub fn normalize_progress(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    if value > 1.0 {
        value / 100.0
    } else {
        value
    }
}

/// Weighted roll-up of KPI progress into goal progress, in percent: sum of
/// weight x progress over 100. KPIs whose weights sum to 100 yield a plain
/// weighted average; other totals scale proportionally, so oversummed
/// weights push the result past 100. Never clamped: the imbalance is
/// surfaced through [`weight_warning`], not hidden in the number.
pub fn weighted_progress(kpis: &[GoalKpi]) -> f64 {
    kpis.iter()
        .map(|kpi| kpi.weight as f64 * kpi.progress)
        .sum::<f64>()
        / 100.0
}

/// Sum of KPI weights, used for the non-blocking imbalance warning.
pub fn weight_total(kpis: &[GoalKpi]) -> u32 {
    kpis.iter().map(|kpi| kpi.weight).sum()
}

/// Advisory message when KPI weights do not add up to 100. A save still
/// succeeds; the caller surfaces this to the manager.
pub fn weight_warning(total: u32) -> Option<String> {
    if total == 100 {
        None
    } else {
        Some(format!("KPI weights add up to {total}%, expected 100%"))
    }
}

/// Advisory message when an employee's goal weights for a period do not add
/// up to 100. Same contract as the KPI variant: never blocks a save.
pub fn goal_weight_warning(goals: &[Goal]) -> Option<String> {
    if goals.is_empty() {
        return None;
    }
    let total: u32 = goals.iter().map(|goal| goal.weight).sum();
    if total == 100 {
        None
    } else {
        Some(format!("goal weights add up to {total}%, expected 100%"))
    }
}

/// Outcome of replacing a goal's KPI set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSaveOutcome {
    /// The recomputed goal progress, in percent, unclamped.
    pub progress: f64,
    pub weight_total: u32,
    pub warning: Option<String>,
}
